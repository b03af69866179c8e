//! Error types for batch runs

use std::path::PathBuf;

use thiserror::Error;

/// Result type for batch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop a run, or a single pair, before its results are written
#[derive(Debug, Error)]
pub enum Error {
    /// Comparison failure for one pair
    #[error(transparent)]
    Compare(#[from] sheetcmp_engine::CompareError),

    /// XLSX report could not be written
    #[error("XLSX error: {0}")]
    Xlsx(#[from] sheetcmp_xlsx::XlsxError),

    /// CSV report could not be written
    #[error("CSV error: {0}")]
    Csv(#[from] sheetcmp_csv::CsvError),

    /// Report table could not be built
    #[error("Core error: {0}")]
    Core(#[from] sheetcmp_core::Error),

    /// File system failure at a known path
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Run settings are invalid or could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker pool could not be started
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Short label for console summaries
    pub fn label(&self) -> &'static str {
        match self {
            Error::Compare(e) => e.label(),
            Error::Xlsx(_) | Error::Csv(_) | Error::Core(_) | Error::Io { .. } => "Write Error",
            Error::Config(_) => "Invalid Configuration",
            Error::ThreadPool(_) => "Run Error",
        }
    }
}
