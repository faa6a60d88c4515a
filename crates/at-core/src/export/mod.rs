//! Export rendering.
//!
//! The API layer selects rows from the store; these modules turn them into
//! downloadable bodies.

mod csv;
mod pdf;

use crate::CoreResult;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Formats accepted by the export endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

/// One asset flattened for export output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRow {
    pub asset_number: String,
    pub asset_type: String,
    pub state: String,
    pub status: String,
    pub serial_number: String,
    pub description: String,
    pub purchase_price: f64,
    pub location: String,
    pub assigned_to: String,
    pub department: String,
    pub created_at: String,
}

/// Render rows in the requested format.
pub fn render_export(rows: &[ExportRow], format: ExportFormat) -> CoreResult<Vec<u8>> {
    match format {
        ExportFormat::Csv => csv::generate(rows),
        ExportFormat::Pdf => pdf::generate(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_row() -> ExportRow {
        ExportRow {
            asset_number: "A-00042".to_string(),
            asset_type: "LAPTOP".to_string(),
            state: "ISSUED".to_string(),
            status: "active".to_string(),
            serial_number: "SN-42".to_string(),
            description: "ThinkPad T14".to_string(),
            purchase_price: 1299.5,
            location: "HQ".to_string(),
            assigned_to: "Ada".to_string(),
            department: "Engineering".to_string(),
            created_at: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn test_csv_export_has_header_and_rows() {
        let out = render_export(&[sample_row()], ExportFormat::Csv).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("asset_number,"));
        assert!(lines.next().unwrap().contains("A-00042"));
    }

    #[test]
    fn test_pdf_export_magic_bytes() {
        let out = render_export(&[sample_row()], ExportFormat::Pdf).unwrap();
        assert!(out.starts_with(b"%PDF"));
    }
}
