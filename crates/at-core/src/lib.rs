//! Asset Tracker Core Library
//!
//! This crate provides the domain layer for the asset lifecycle tracker:
//! lifecycle enums and the state-transition table, depreciation projections,
//! CSV/XLSX import parsing, CSV/PDF export rendering, and chart rendering.
//! Persistence and the HTTP surface live in `at-api`.

pub mod chart;
pub mod depreciation;
pub mod export;
pub mod import;
pub mod types;

use thiserror::Error;

pub use chart::{render_inventory_chart, TypeCount};
pub use depreciation::{depreciated_value, DepreciationMethod};
pub use export::{ExportFormat, ExportRow};
pub use import::{parse_import, ImportFormat, ImportOutcome, ImportedRow};
pub use types::{AssetState, AssetStatus, AssetType, AssignmentType, Role};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Chart error: {0}")]
    Chart(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
