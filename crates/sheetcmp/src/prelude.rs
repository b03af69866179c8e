//! Prelude module - common imports for sheetcmp users
//!
//! ```rust
//! use sheetcmp::prelude::*;
//! ```

pub use crate::{
    // Batch types
    BatchRunner,
    CellValue,
    CollectingSink,
    // Comparison types
    CompareConfig,
    ComparisonSession,
    // Error types
    Error,
    FileTableSource,
    MismatchBasis,
    PairSummary,
    ProgressRow,
    ProgressSink,
    ReportFormat,
    Result,
    RunConfig,
    Stage,
    Status,
    Table,
    TableSource,
    TargetOutcome,
    TargetReport,
    Workbook,
    // Extension traits
    WorkbookExt,
};
