//! # sheetcmp-engine
//!
//! The staged comparison engine. A pair of files goes through an ordered list of
//! cheap-to-expensive equality checks and stops at the first one that proves the
//! files differ:
//!
//! 1. file names
//! 2. sheet name sets
//! 3. per sheet: shapes, column names, column types, empty data
//! 4. per sheet: row-by-row cell data ([`RowDiffer`]), aborted early when the
//!    mismatch ratio shows the sheets have little in common
//!
//! Cell differences are then cut into bounded [`ReportSegment`]s, one per output
//! sheet of the difference report.
//!
//! ## Example
//!
//! ```rust
//! use sheetcmp_core::{CellValue, TableBuilder, Workbook};
//! use sheetcmp_engine::{CompareConfig, ComparisonSession, MemorySource, Status};
//!
//! fn workbook(amount: i64) -> Workbook {
//!     let mut builder = TableBuilder::with_header(["Id", "Amount"]);
//!     builder.push_row(vec![CellValue::from(1), CellValue::from(amount)]);
//!     let mut wb = Workbook::new();
//!     wb.add_sheet("Sheet1", builder.finish().unwrap()).unwrap();
//!     wb
//! }
//!
//! let session = ComparisonSession::new(CompareConfig::default()).unwrap();
//! let mut v1 = MemorySource::new("ledger.xlsx", workbook(10));
//! let mut v2 = MemorySource::new("ledger.xlsx", workbook(10));
//!
//! let summary = session.run(&mut v1, &mut v2).unwrap();
//! assert_eq!(summary.outcome.status, Status::PerfectMatch);
//! assert!(summary.segments.is_empty());
//! ```

pub mod config;
pub mod differ;
pub mod error;
pub mod fingerprint;
pub mod outcome;
pub mod report;
pub mod session;
pub mod source;
pub mod stage;

pub use config::{CompareConfig, MismatchBasis};
pub use differ::{
    differ_for, AbortThreshold, CellDiff, DiffMode, FingerprintDiffer, PerCellDiffer,
    RowDiffResult, RowDiffer, ScanStats,
};
pub use error::{CompareError, CompareResult};
pub use outcome::{
    ColumnDifference, ComparisonOutcome, Detail, SheetOutcome, Stage, Status, TypeDifference,
};
pub use report::{DiffRecord, DiffReportBuilder, ReportSegment, REPORT_COLUMNS};
pub use session::{ComparisonSession, PairSummary};
pub use source::{MemorySource, TableSource};
pub use stage::{SheetComparison, StageComparator, StageVerdict};
