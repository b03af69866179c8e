//! Run settings
//!
//! A settings file holds the comparison settings under `[compare]` next to the
//! batch settings:
//!
//! ```toml
//! jobs = 4
//! report_format = "csv"
//! extensions = ["xlsx", "xlsm"]
//!
//! [compare]
//! hash_mode = true
//! mismatch_abort_ratio = 0.05
//! mismatch_basis = "rows"
//! ```

use std::fmt;
use std::str::FromStr;

use sheetcmp_engine::CompareConfig;

use crate::error::{Error, Result};
use crate::source::SUPPORTED_EXTENSIONS;

/// Format of the difference files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ReportFormat {
    /// One `differences.xlsx` with a sheet per segment
    #[default]
    Xlsx,
    /// One `differences_N.csv` per segment
    Csv,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Csv => "csv",
        })
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ReportFormat::Xlsx),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!(
                "unknown report format '{}' (expected 'xlsx' or 'csv')",
                other
            )),
        }
    }
}

/// Settings of a batch run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RunConfig {
    pub compare: CompareConfig,
    /// Worker threads; `None` uses the available parallelism
    pub jobs: Option<usize>,
    pub report_format: ReportFormat,
    /// File extensions searched for in each side's folder
    pub extensions: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            compare: CompareConfig::default(),
            jobs: None,
            report_format: ReportFormat::default(),
            extensions: vec!["xlsx".to_string()],
        }
    }
}

impl RunConfig {
    /// Load settings from a TOML file
    #[cfg(feature = "serde")]
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse settings from a TOML string
    #[cfg(feature = "serde")]
    pub fn parse(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check every setting
    pub fn validate(&self) -> Result<()> {
        self.compare.validate()?;
        if self.jobs == Some(0) {
            return Err(Error::Config("jobs must be at least 1".into()));
        }
        if self.extensions.is_empty() {
            return Err(Error::Config("at least one file extension is required".into()));
        }
        for ext in &self.extensions {
            if !SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                return Err(Error::Config(format!(
                    "unsupported file extension '{}' (supported: {})",
                    ext,
                    SUPPORTED_EXTENSIONS.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Worker thread count to use
    pub fn worker_count(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        })
    }
}
