//! Error types for the comparison engine

use thiserror::Error;

/// Result type for comparison operations
pub type CompareResult<T> = std::result::Result<T, CompareError>;

/// Errors that stop a pair comparison before a verdict is reached
///
/// A verdict such as `ShapeMismatch` is an outcome, not an error. These variants
/// cover the cases where no verdict can be given for the pair at all.
#[derive(Debug, Error)]
pub enum CompareError {
    /// A file or one of its sheets could not be read
    #[error("Cannot read '{file}': {source}")]
    ResourceFailure {
        file: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A sheet was read but does not form a valid table
    #[error("Malformed sheet '{sheet}' in '{file}': {source}")]
    MalformedInput {
        file: String,
        sheet: String,
        #[source]
        source: sheetcmp_core::Error,
    },

    /// The comparison settings are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CompareError {
    /// Wrap a reader failure for the given file
    pub fn resource<F, E>(file: F, source: E) -> Self
    where
        F: Into<String>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        CompareError::ResourceFailure {
            file: file.into(),
            source: source.into(),
        }
    }

    /// Wrap a table validation failure for the given sheet
    pub fn malformed(
        file: impl Into<String>,
        sheet: impl Into<String>,
        source: sheetcmp_core::Error,
    ) -> Self {
        CompareError::MalformedInput {
            file: file.into(),
            sheet: sheet.into(),
            source,
        }
    }

    /// Short label for console summaries
    pub fn label(&self) -> &'static str {
        match self {
            CompareError::ResourceFailure { .. } => "Read Error",
            CompareError::MalformedInput { .. } => "Malformed Input",
            CompareError::InvalidConfig(_) => "Invalid Configuration",
        }
    }
}
