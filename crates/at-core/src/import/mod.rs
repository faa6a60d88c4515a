//! Bulk import parsing and row mapping.
//!
//! Handles CSV and XLSX uploads. Parsing is best-effort at the row level: a
//! row whose type column does not parse is skipped while the remaining rows
//! survive, and malformed dates fall back to the supplied `today`. Whether the
//! surviving rows commit is the caller's concern (the API layer inserts them
//! as one batch).

mod csv;
mod xlsx;

use crate::types::{AssetState, AssetType, AssignmentType};
use crate::{CoreError, CoreResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Upload formats accepted by the import endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    Csv,
    Xlsx,
}

impl FromStr for ImportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ImportFormat::Csv),
            "xlsx" => Ok(ImportFormat::Xlsx),
            other => Err(format!("unknown import format: {}", other)),
        }
    }
}

/// One parsed upload row, ready to become a holding-asset record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedRow {
    pub asset_type: AssetType,
    pub serial_number: String,
    pub description: String,
    pub purchase_price: f64,
    pub purchase_date: NaiveDate,
    pub state: AssetState,
    pub assignment_type: AssignmentType,
    pub assigned_to: Option<String>,
    pub employee_id: Option<String>,
    pub department: Option<String>,
}

/// Parse result: surviving rows plus how many were dropped.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub rows: Vec<ImportedRow>,
    pub skipped: usize,
}

/// Raw record as read from the file: normalized header -> cell text.
type RawRecord = HashMap<String, String>;

/// Parse an uploaded file into holding-asset candidates.
///
/// `target_type` applies to rows without a type column of their own. `today`
/// is the fallback for missing or malformed purchase dates.
pub fn parse_import(
    bytes: &[u8],
    format: ImportFormat,
    target_type: AssetType,
    today: NaiveDate,
) -> CoreResult<ImportOutcome> {
    let records = match format {
        ImportFormat::Csv => csv::read_records(bytes)?,
        ImportFormat::Xlsx => xlsx::read_records(bytes)?,
    };

    let mut rows = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for record in &records {
        match map_record(record, target_type, today) {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
    }

    if rows.is_empty() && skipped == 0 {
        return Err(CoreError::Import("file contains no data rows".to_string()));
    }

    Ok(ImportOutcome { rows, skipped })
}

/// Header aliases seen in the wild; normalized to lowercase-underscore first.
fn field<'a>(record: &'a RawRecord, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|n| record.get(*n))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

fn map_record(record: &RawRecord, target_type: AssetType, today: NaiveDate) -> Option<ImportedRow> {
    // ignore padding rows that spreadsheets love to append
    if record.values().all(|v| v.trim().is_empty()) {
        return None;
    }

    // a row-level type overrides the batch target; an invalid one drops the row
    let asset_type = match field(record, &["type", "asset_type"]) {
        Some(raw) => match raw.parse::<AssetType>() {
            Ok(t) => t,
            Err(_) => {
                tracing::debug!(value = raw, "skipping import row with unknown type");
                return None;
            }
        },
        None => target_type,
    };

    let purchase_date = field(record, &["purchase_date", "purchased", "acquisition_date"])
        .and_then(parse_date)
        .unwrap_or(today);

    let state = field(record, &["state"])
        .and_then(|s| s.parse::<AssetState>().ok())
        .unwrap_or(AssetState::Available);

    let assignment_type = field(record, &["assignment_type", "assignment"])
        .and_then(|s| s.parse::<AssignmentType>().ok())
        .unwrap_or(AssignmentType::Individual);

    Some(ImportedRow {
        asset_type,
        serial_number: field(record, &["serial_number", "serial"])
            .unwrap_or_default()
            .to_string(),
        description: field(record, &["description", "name", "model"])
            .unwrap_or_default()
            .to_string(),
        purchase_price: field(record, &["purchase_price", "price", "value"])
            .and_then(|s| s.replace(',', "").parse::<f64>().ok())
            .unwrap_or(0.0),
        purchase_date,
        state,
        assignment_type,
        assigned_to: field(record, &["assigned_to"]).map(str::to_string),
        employee_id: field(record, &["employee_id"]).map(str::to_string),
        department: field(record, &["department"]).map(str::to_string),
    })
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];
    FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
}

pub(crate) fn normalize_header(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_invalid_type_row_is_skipped_not_fatal() {
        let data = b"type,serial_number,description\n\
            LAPTOP,SN-1,ThinkPad\n\
            TOASTER,SN-2,not an it asset\n\
            MONITOR,SN-3,Dell 27\n";
        let outcome =
            parse_import(data, ImportFormat::Csv, AssetType::Desktop, today()).unwrap();
        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.rows[0].asset_type, AssetType::Laptop);
        assert_eq!(outcome.rows[1].asset_type, AssetType::Monitor);
    }

    #[test]
    fn test_missing_type_column_uses_batch_target() {
        let data = b"serial_number,description\nSN-9,Pixel 8\n";
        let outcome =
            parse_import(data, ImportFormat::Csv, AssetType::MobilePhone, today()).unwrap();
        assert_eq!(outcome.rows[0].asset_type, AssetType::MobilePhone);
    }

    #[test]
    fn test_defaults_for_state_and_assignment() {
        let data = b"type,serial_number\nTABLET,SN-4\n";
        let outcome = parse_import(data, ImportFormat::Csv, AssetType::Tablet, today()).unwrap();
        let row = &outcome.rows[0];
        assert_eq!(row.state, AssetState::Available);
        assert_eq!(row.assignment_type, AssignmentType::Individual);
    }

    #[test]
    fn test_malformed_date_falls_back_to_today() {
        let data = b"type,serial_number,purchase_date\nLAPTOP,SN-5,next tuesday\n";
        let outcome = parse_import(data, ImportFormat::Csv, AssetType::Laptop, today()).unwrap();
        assert_eq!(outcome.rows[0].purchase_date, today());
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(
            parse_date("2023-05-04"),
            NaiveDate::from_ymd_opt(2023, 5, 4)
        );
        assert_eq!(
            parse_date("04/05/2023"),
            NaiveDate::from_ymd_opt(2023, 5, 4)
        );
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn test_price_with_thousands_separator() {
        let data = b"type,serial_number,purchase_price\nDESKTOP,SN-6,\"1,299.50\"\n";
        let outcome = parse_import(data, ImportFormat::Csv, AssetType::Desktop, today()).unwrap();
        assert_eq!(outcome.rows[0].purchase_price, 1299.5);
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let data = b"type,serial_number\n";
        assert!(parse_import(data, ImportFormat::Csv, AssetType::Desktop, today()).is_err());
    }

    #[test]
    fn test_blank_padding_rows_are_skipped() {
        let data = b"type,serial_number\nLAPTOP,SN-7\n,\n";
        let outcome = parse_import(data, ImportFormat::Csv, AssetType::Laptop, today()).unwrap();
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.skipped, 1);
    }
}
