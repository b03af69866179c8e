//! # sheetcmp
//!
//! Batch comparison of spreadsheet file pairs.
//!
//! A root folder holds one target folder per comparison. Each target holds two
//! side folders (V1 and V2, in name order) with one workbook each. Every pair is
//! run through the staged comparison of [`sheetcmp_engine`] on a worker pool, and
//! a `report.txt` plus the difference files are written into the target folder.
//!
//! ## Features
//!
//! - XLSX, XLSM and CSV inputs
//! - Early stopping at the first failed stage
//! - Row fingerprint or per-cell comparison
//! - Difference reports as XLSX sheets or CSV files, split into bounded segments
//! - TOML settings files (`serde` feature)
//!
//! ## Example
//!
//! ```rust,no_run
//! use sheetcmp::prelude::*;
//!
//! let runner = BatchRunner::new(RunConfig::default()).unwrap();
//! let sink = |row: ProgressRow| println!("{} {}", row.target, row.status);
//! for report in runner.run("comparisons", &sink).unwrap() {
//!     if let Some(summary) = report.summary() {
//!         println!("{}: {}", report.target, summary.status());
//!     }
//! }
//! ```

pub mod batch;
pub mod config;
pub mod discovery;
pub mod error;
pub mod prelude;
pub mod report;
pub mod source;

pub use batch::{
    BatchRunner, CollectingSink, ProgressRow, ProgressSink, TargetOutcome, TargetReport,
};
pub use config::{ReportFormat, RunConfig};
pub use discovery::{discover, DiscoveryIssue, PairJob, Target};
pub use error::{Error, Result};
pub use report::{render_report, write_pair_reports, DIFFERENCES_XLSX, REPORT_TXT};
pub use source::{FileTableSource, SUPPORTED_EXTENSIONS};

// Re-export core types
pub use sheetcmp_core::{CellValue, DataType, Shape, Table, TableBuilder, Workbook};

// Re-export engine types
pub use sheetcmp_engine::{
    CompareConfig, CompareError, ComparisonOutcome, ComparisonSession, MismatchBasis,
    PairSummary, SheetOutcome, Stage, Status, TableSource,
};

// Re-export I/O types
pub use sheetcmp_csv::{CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
pub use sheetcmp_xlsx::{XlsxError, XlsxReader, XlsxWriter};

use std::path::Path;

/// Extension trait for Workbook to add file I/O
pub trait WorkbookExt: Sized {
    /// Read every sheet of a file, choosing the reader by extension
    fn open<P: AsRef<Path>>(path: P) -> Result<Self>;

    /// Save the workbook, choosing the writer by extension
    ///
    /// A CSV file takes the first sheet.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

impl WorkbookExt for Workbook {
    fn open<P: AsRef<Path>>(path: P) -> Result<Workbook> {
        let path = path.as_ref();
        match source::extension_of(path).as_deref() {
            Some("xlsx") | Some("xlsm") => Ok(XlsxReader::read_file(path)?),
            Some("csv") => {
                let table = CsvReader::read_file(path, &CsvReadOptions::default())?;
                let mut workbook = Workbook::new();
                workbook.add_sheet(sheetcmp_csv::CSV_SHEET_NAME, table)?;
                Ok(workbook)
            }
            _ => Err(Error::Config(format!(
                "unsupported file format: {}",
                path.display()
            ))),
        }
    }

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match source::extension_of(path).as_deref() {
            Some("xlsx") => Ok(XlsxWriter::write_file(self, path)?),
            Some("csv") => match self.sheet_at(0) {
                Some((_, table)) => {
                    Ok(CsvWriter::write_file(table, path, &CsvWriteOptions::default())?)
                }
                None => Err(Error::Config("no sheets to save".into())),
            },
            _ => Err(Error::Config(format!(
                "unsupported file format: {}",
                path.display()
            ))),
        }
    }
}
