//! Error types for sheetcmp-core

use thiserror::Error;

use crate::column::DataType;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheetcmp-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Row index out of bounds
    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u16, u16),

    /// A row does not have one value per column
    #[error("Row {row} has {actual} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A value does not belong to its column's data type
    #[error("Row {row}, column '{column}': {actual} value in {expected} column")]
    ValueTypeMismatch {
        row: usize,
        column: String,
        expected: DataType,
        actual: DataType,
    },

    /// Two columns share a name
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Invalid sheet name
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    /// Duplicate sheet name
    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error reports a table that breaks the row/column invariants
    pub fn is_malformed_table(&self) -> bool {
        matches!(
            self,
            Error::RaggedRow { .. } | Error::ValueTypeMismatch { .. } | Error::DuplicateColumn(_)
        )
    }
}
