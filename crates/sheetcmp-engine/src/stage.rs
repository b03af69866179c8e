//! The staged comparison pipeline
//!
//! Pair-level stages look at file identifiers and sheet name sets. Sheet-level
//! stages run once per sheet present in both files and stop that sheet at the
//! first failing check. A failing sheet does not stop the other sheets.

use std::collections::BTreeSet;

use sheetcmp_core::{Table, Workbook};
use tracing::debug;

use crate::config::CompareConfig;
use crate::differ::{differ_for, AbortThreshold, CellDiff, RowDiffResult, RowDiffer};
use crate::error::CompareResult;
use crate::outcome::{
    ColumnDifference, ComparisonOutcome, Detail, SheetOutcome, Stage, Status, TypeDifference,
};

/// Result of a single stage predicate
#[derive(Debug, Clone, PartialEq)]
pub enum StageVerdict {
    /// The check passed; move on to the next stage
    Continue,
    /// The check decided the verdict
    Terminal { status: Status, detail: Detail },
}

impl StageVerdict {
    fn terminal(status: Status, detail: Detail) -> Self {
        StageVerdict::Terminal { status, detail }
    }
}

type SheetCheck = fn(&Table, &Table) -> StageVerdict;

/// Sheet-level structural checks, cheapest first
const SHEET_STAGES: [(Stage, SheetCheck); 4] = [
    (Stage::Shape, check_shape),
    (Stage::Columns, check_columns),
    (Stage::Types, check_types),
    (Stage::EmptyData, check_empty),
];

/// Compare file identifiers
pub fn check_file_names(v1: &str, v2: &str) -> StageVerdict {
    if v1 == v2 {
        StageVerdict::Continue
    } else {
        StageVerdict::terminal(
            Status::NameMismatch,
            Detail::FileNames {
                v1: v1.to_string(),
                v2: v2.to_string(),
            },
        )
    }
}

/// Compare sheet name sets, ignoring order
pub fn check_sheet_names(v1: &[String], v2: &[String]) -> StageVerdict {
    let set1: BTreeSet<&str> = v1.iter().map(String::as_str).collect();
    let set2: BTreeSet<&str> = v2.iter().map(String::as_str).collect();
    if set1 == set2 {
        return StageVerdict::Continue;
    }

    StageVerdict::terminal(
        Status::SheetMismatch,
        Detail::SheetNames {
            only_in_v1: set1.difference(&set2).map(|s| s.to_string()).collect(),
            only_in_v2: set2.difference(&set1).map(|s| s.to_string()).collect(),
        },
    )
}

fn check_shape(v1: &Table, v2: &Table) -> StageVerdict {
    if v1.shape() == v2.shape() {
        StageVerdict::Continue
    } else {
        StageVerdict::terminal(
            Status::ShapeMismatch,
            Detail::Shapes {
                v1: v1.shape(),
                v2: v2.shape(),
            },
        )
    }
}

fn check_columns(v1: &Table, v2: &Table) -> StageVerdict {
    let diffs: Vec<_> = v1
        .column_names()
        .zip(v2.column_names())
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(position, (a, b))| ColumnDifference {
            position,
            v1: a.to_string(),
            v2: b.to_string(),
        })
        .collect();

    if diffs.is_empty() {
        StageVerdict::Continue
    } else {
        StageVerdict::terminal(Status::ColumnMismatch, Detail::Columns(diffs))
    }
}

fn check_types(v1: &Table, v2: &Table) -> StageVerdict {
    let diffs: Vec<_> = v1
        .columns()
        .iter()
        .zip(v2.columns())
        .filter(|(a, b)| a.dtype != b.dtype)
        .map(|(a, b)| TypeDifference {
            column: a.name.clone(),
            v1: a.dtype,
            v2: b.dtype,
        })
        .collect();

    if diffs.is_empty() {
        StageVerdict::Continue
    } else {
        StageVerdict::terminal(Status::TypeMismatch, Detail::Types(diffs))
    }
}

fn check_empty(v1: &Table, v2: &Table) -> StageVerdict {
    // Shapes are equal at this point, so checking one side is enough.
    debug_assert_eq!(v1.is_empty(), v2.is_empty());
    if v1.is_empty() {
        StageVerdict::terminal(Status::EmptyMatch, Detail::Empty)
    } else {
        StageVerdict::Continue
    }
}

/// Verdict for one sheet together with its cell differences
#[derive(Debug, Clone, PartialEq)]
pub struct SheetComparison {
    pub outcome: SheetOutcome,
    /// Cell differences, empty unless the sheet ended in a data mismatch
    pub diffs: Vec<CellDiff>,
}

/// Runs the stages in order and stops at the first terminal one
pub struct StageComparator {
    differ: Box<dyn RowDiffer>,
    threshold: AbortThreshold,
}

impl StageComparator {
    /// Create a comparator with an explicit row differ
    pub fn new(differ: Box<dyn RowDiffer>, threshold: AbortThreshold) -> Self {
        Self { differ, threshold }
    }

    /// Create a comparator from a validated configuration
    pub fn from_config(config: &CompareConfig) -> CompareResult<Self> {
        config.validate()?;
        Ok(Self::new(
            differ_for(config),
            AbortThreshold::from_config(config),
        ))
    }

    /// The row differ in use
    pub fn differ(&self) -> &dyn RowDiffer {
        self.differ.as_ref()
    }

    /// Run the file name stage
    pub fn check_names(&self, name_v1: &str, name_v2: &str) -> Option<ComparisonOutcome> {
        terminal_pair(Stage::Name, check_file_names(name_v1, name_v2))
    }

    /// Run the sheet set stage
    pub fn check_sheets(
        &self,
        sheets_v1: &[String],
        sheets_v2: &[String],
    ) -> Option<ComparisonOutcome> {
        terminal_pair(Stage::Sheets, check_sheet_names(sheets_v1, sheets_v2))
    }

    /// Run the sheet stages and, if they all pass, the row scan
    pub fn compare_sheet(&self, name: &str, v1: &Table, v2: &Table) -> SheetComparison {
        let mut outcome = SheetOutcome {
            name: name.to_string(),
            stage: Stage::RowData,
            status: Status::PerfectMatch,
            detail: Detail::None,
            shape_v1: v1.shape(),
            shape_v2: v2.shape(),
            dtypes_v1: v1.dtypes(),
            dtypes_v2: v2.dtypes(),
            scan: None,
        };

        for (stage, check) in SHEET_STAGES {
            if let StageVerdict::Terminal { status, detail } = check(v1, v2) {
                debug!(sheet = name, %stage, %status, "sheet stopped at structural stage");
                outcome.stage = stage;
                outcome.status = status;
                outcome.detail = detail;
                return SheetComparison {
                    outcome,
                    diffs: Vec::new(),
                };
            }
        }

        let result = self.differ.diff(v1, v2);
        outcome.scan = Some(*result.stats());
        let diffs = match result {
            RowDiffResult::PerfectMatch { .. } => Vec::new(),
            RowDiffResult::MassiveDivergence { ratio, stats } => {
                outcome.status = Status::MassiveDivergence;
                outcome.detail = Detail::Divergence {
                    ratio,
                    limit: self.threshold.ratio,
                    basis: self.threshold.basis,
                };
                debug!(
                    sheet = name,
                    rows_scanned = stats.rows_scanned,
                    ratio,
                    "row scan aborted"
                );
                Vec::new()
            }
            RowDiffResult::DataMismatch { diffs, stats } => {
                outcome.status = Status::DataMismatch;
                outcome.detail = Detail::Differences {
                    rows: stats.mismatched_rows,
                    cells: stats.mismatched_cells,
                };
                diffs
            }
        };
        debug!(
            sheet = name,
            status = %outcome.status,
            mode = %self.differ.mode(),
            "sheet compared"
        );

        SheetComparison { outcome, diffs }
    }

    /// Compare two in-memory workbooks, running every stage
    ///
    /// Sheets are visited in the order of `v1`. Cell differences are dropped; use
    /// [`compare_sheet`](Self::compare_sheet) to keep them.
    pub fn compare(
        &self,
        name_v1: &str,
        name_v2: &str,
        v1: &Workbook,
        v2: &Workbook,
    ) -> ComparisonOutcome {
        if let Some(outcome) = self.check_names(name_v1, name_v2) {
            return outcome;
        }
        if let Some(outcome) = self.check_sheets(&v1.sheet_names(), &v2.sheet_names()) {
            return outcome;
        }

        let sheets = v1
            .sheets()
            .filter_map(|(name, t1)| {
                v2.sheet(name)
                    .map(|t2| self.compare_sheet(name, t1, t2).outcome)
            })
            .collect();
        ComparisonOutcome::from_sheets(sheets)
    }
}

impl std::fmt::Debug for StageComparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageComparator")
            .field("mode", &self.differ.mode())
            .field("threshold", &self.threshold)
            .finish()
    }
}

fn terminal_pair(stage: Stage, verdict: StageVerdict) -> Option<ComparisonOutcome> {
    match verdict {
        StageVerdict::Continue => None,
        StageVerdict::Terminal { status, detail } => {
            debug!(%stage, %status, "pair stopped at stage");
            Some(ComparisonOutcome::pair_level(stage, status, detail))
        }
    }
}
