//! Input adapters for the two registries.
//!
//! Each loader reads a whole file into memory and returns its records in
//! file order. Loaders fail fast: the first malformed row aborts the load.

pub mod admin;
pub mod postal;

use thiserror::Error;

pub use admin::{AdminLayout, AdminSheetLoader};
pub use postal::{PostalLayout, PostalTsvLoader};

/// Errors that can occur while loading a registry.
#[derive(Error, Debug)]
pub enum LoadError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Workbook could not be opened or read
    #[error("Workbook error: {0}")]
    WorkbookError(#[from] calamine::Error),

    /// Named sheet missing from the workbook
    #[error("Sheet '{sheet}' not found (available: {available})")]
    SheetNotFound { sheet: String, available: String },

    /// Delimited text parsing error
    #[error("TSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Row too short for the configured layout
    #[error("Row {row} has no column {column}")]
    MissingColumn { row: usize, column: usize },

    /// Spreadsheet cell holding an error value
    #[error("Error value in row {row}, column {column}: {value}")]
    CellError {
        row: usize,
        column: usize,
        value: String,
    },

    /// Field bytes are not valid UTF-8
    #[error("Row {row}, column {column} is not valid UTF-8: {source}")]
    Decode {
        row: usize,
        column: usize,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// A source of fully materialized records.
pub trait RecordSource {
    type Record;

    /// Human-readable description used in logs and errors
    fn describe(&self) -> String;

    /// Load every record.
    fn load(&self) -> Result<Vec<Self::Record>, LoadError>;
}
