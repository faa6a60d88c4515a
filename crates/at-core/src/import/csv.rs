//! CSV upload reader.

use super::{normalize_header, RawRecord};
use crate::CoreResult;

pub fn read_records(bytes: &[u8]) -> CoreResult<Vec<RawRecord>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = RawRecord::new();
        for (i, value) in record.iter().enumerate() {
            if let Some(name) = headers.get(i) {
                row.insert(name.clone(), value.to_string());
            }
        }
        records.push(row);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_are_normalized() {
        let data = b"Serial Number,Purchase-Date\nSN-1,2024-01-01\n";
        let records = read_records(data).unwrap();
        assert_eq!(records[0].get("serial_number").unwrap(), "SN-1");
        assert_eq!(records[0].get("purchase_date").unwrap(), "2024-01-01");
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let data = b"a,b,c\n1,2\n";
        let records = read_records(data).unwrap();
        assert_eq!(records[0].get("a").unwrap(), "1");
        assert!(records[0].get("c").is_none());
    }
}
