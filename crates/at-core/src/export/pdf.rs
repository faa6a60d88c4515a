//! PDF export generation.
//!
//! Renders a plain tabular listing on landscape A4, paginating as needed.
//! Column layout is fixed; long descriptions are truncated to fit.

use super::ExportRow;
use crate::{CoreError, CoreResult};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};

const PAGE_W: f64 = 297.0;
const PAGE_H: f64 = 210.0;
const MARGIN: f64 = 12.0;
const LINE_H: f64 = 6.0;
const FONT_SIZE: f64 = 8.0;

// column x-offsets in mm, matched to COLUMNS below
const COLS: [f64; 9] = [12.0, 40.0, 68.0, 92.0, 112.0, 150.0, 200.0, 228.0, 258.0];
const COLUMNS: [&str; 9] = [
    "Asset #", "Type", "State", "Status", "Serial", "Description", "Price", "Location", "Assigned",
];

pub fn generate(rows: &[ExportRow]) -> CoreResult<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new("Asset Export", Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| CoreError::Export(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| CoreError::Export(e.to_string()))?;

    let mut current = doc.get_page(page).get_layer(layer);
    let mut y = draw_header(&current, &font_bold);

    for row in rows {
        if y < MARGIN {
            let (page, layer) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
            current = doc.get_page(page).get_layer(layer);
            y = draw_header(&current, &font_bold);
        }
        let price = format!("{:.2}", row.purchase_price);
        let cells = [
            row.asset_number.as_str(),
            row.asset_type.as_str(),
            row.state.as_str(),
            row.status.as_str(),
            row.serial_number.as_str(),
            row.description.as_str(),
            price.as_str(),
            row.location.as_str(),
            row.assigned_to.as_str(),
        ];
        for (x, cell) in COLS.iter().zip(cells.iter()) {
            current.use_text(truncate(cell, 28), FONT_SIZE, Mm(*x), Mm(y), &font);
        }
        y -= LINE_H;
    }

    finish(doc)
}

fn draw_header(layer: &printpdf::PdfLayerReference, font_bold: &IndirectFontRef) -> f64 {
    let y = PAGE_H - MARGIN;
    layer.use_text("Asset Export", 12.0, Mm(MARGIN), Mm(y), font_bold);
    let y = y - 2.0 * LINE_H;
    for (x, title) in COLS.iter().zip(COLUMNS.iter()) {
        layer.use_text(*title, FONT_SIZE, Mm(*x), Mm(y), font_bold);
    }
    y - LINE_H
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

fn finish(doc: PdfDocumentReference) -> CoreResult<Vec<u8>> {
    let mut out = Vec::new();
    doc.save(&mut std::io::BufWriter::new(&mut out))
        .map_err(|e| CoreError::Export(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::super::tests::sample_row;
    use super::*;

    #[test]
    fn test_paginates_past_one_page() {
        let rows: Vec<ExportRow> = (0..120).map(|_| sample_row()).collect();
        let out = generate(&rows).unwrap();
        assert!(out.starts_with(b"%PDF"));
        // two pages means two /Page objects beyond the catalog
        let text = String::from_utf8_lossy(&out);
        assert!(text.matches("/Type /Page").count() >= 2);
    }

    #[test]
    fn test_truncate_keeps_short_strings() {
        assert_eq!(truncate("short", 28), "short");
        assert_eq!(truncate(&"x".repeat(40), 10).chars().count(), 10);
    }
}
