//! XLSX upload reader.
//!
//! Reads the first worksheet; the first row is the header.

use super::{normalize_header, RawRecord};
use crate::{CoreError, CoreResult};
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

pub fn read_records(bytes: &[u8]) -> CoreResult<Vec<RawRecord>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| CoreError::Xlsx(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CoreError::Xlsx("workbook has no sheets".to_string()))?
        .map_err(|e| CoreError::Xlsx(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| CoreError::Xlsx("first sheet is empty".to_string()))?
        .iter()
        .map(|cell| normalize_header(&cell_text(cell)))
        .collect();

    let mut records = Vec::new();
    for row in rows {
        let mut record = RawRecord::new();
        for (i, cell) in row.iter().enumerate() {
            if let Some(name) = headers.get(i) {
                record.insert(name.clone(), cell_text(cell));
            }
        }
        records.push(record);
    }
    Ok(records)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Bool(b) => b.to_string(),
        Data::Int(i) => i.to_string(),
        // serial numbers come through as floats; keep integral ones clean
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{:?}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_float_cells_render_without_fraction() {
        assert_eq!(cell_text(&Data::Float(12345.0)), "12345");
        assert_eq!(cell_text(&Data::Float(12.5)), "12.5");
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        assert!(read_records(b"this is not a zip archive").is_err());
    }
}
