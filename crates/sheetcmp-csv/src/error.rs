//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur during CSV operations
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheetcmp_core::Error),
}

impl CsvError {
    /// Whether the error comes from records that do not form a valid table
    pub fn is_malformed_table(&self) -> bool {
        matches!(self, CsvError::Core(e) if e.is_malformed_table())
    }
}
