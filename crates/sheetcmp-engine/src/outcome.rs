//! Comparison verdicts

use std::fmt;

use sheetcmp_core::{DataType, Shape};

use crate::config::MismatchBasis;
use crate::differ::ScanStats;

/// The comparison stages, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// File identifiers
    Name,
    /// Sheet name sets
    Sheets,
    /// Row and column counts
    Shape,
    /// Column names in order
    Columns,
    /// Column types in order
    Types,
    /// Header-only sheets
    EmptyData,
    /// Cell values
    RowData,
}

impl Stage {
    /// Get the display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Name => "name",
            Stage::Sheets => "sheets",
            Stage::Shape => "shape",
            Stage::Columns => "columns",
            Stage::Types => "types",
            Stage::EmptyData => "empty-data",
            Stage::RowData => "row-data",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict of a comparison, ordered by increasing severity
///
/// Structural mismatches rank above data mismatches, and an earlier structural
/// stage ranks above a later one. A workbook pair takes the most severe status of
/// its sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    /// Every cell matched
    PerfectMatch,
    /// Both sheets hold headers only
    EmptyMatch,
    /// Some cells differ
    DataMismatch,
    /// Too many cells differ to report them
    MassiveDivergence,
    /// Column types differ
    TypeMismatch,
    /// Column names differ
    ColumnMismatch,
    /// Row or column counts differ
    ShapeMismatch,
    /// Sheet name sets differ
    SheetMismatch,
    /// File identifiers differ
    NameMismatch,
}

impl Status {
    /// Get the label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Status::PerfectMatch => "Perfect Match",
            Status::EmptyMatch => "Empty Match",
            Status::DataMismatch => "Data Mismatch",
            Status::MassiveDivergence => "Massive Divergence",
            Status::TypeMismatch => "Type Mismatch",
            Status::ColumnMismatch => "Column Mismatch",
            Status::ShapeMismatch => "Shape Mismatch",
            Status::SheetMismatch => "Sheet Mismatch",
            Status::NameMismatch => "Name Mismatch",
        }
    }

    /// Whether the compared items are considered equal
    pub fn is_match(&self) -> bool {
        matches!(self, Status::PerfectMatch | Status::EmptyMatch)
    }

    /// Whether the verdict came from a structural stage
    pub fn is_structural(&self) -> bool {
        *self >= Status::TypeMismatch
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A column whose name differs at the same position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDifference {
    pub position: usize,
    pub v1: String,
    pub v2: String,
}

/// A column whose type differs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDifference {
    pub column: String,
    pub v1: DataType,
    pub v2: DataType,
}

/// What a verdict is based on
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    /// Nothing to add
    None,
    /// The two file identifiers
    FileNames { v1: String, v2: String },
    /// Sheets present on one side only
    SheetNames {
        only_in_v1: Vec<String>,
        only_in_v2: Vec<String>,
    },
    /// The two shapes
    Shapes { v1: Shape, v2: Shape },
    /// Column names that differ
    Columns(Vec<ColumnDifference>),
    /// Column types that differ
    Types(Vec<TypeDifference>),
    /// Both sheets have headers but no data rows
    Empty,
    /// The scan was aborted
    Divergence {
        ratio: f64,
        limit: f64,
        basis: MismatchBasis,
    },
    /// Counts of differing rows and cells
    Differences { rows: usize, cells: usize },
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detail::None => Ok(()),
            Detail::FileNames { v1, v2 } => write!(f, "V1: {} != V2: {}", v1, v2),
            Detail::SheetNames {
                only_in_v1,
                only_in_v2,
            } => write!(
                f,
                "Only in V1: {:?}; Only in V2: {:?}",
                only_in_v1, only_in_v2
            ),
            Detail::Shapes { v1, v2 } => write!(f, "V1: {} != V2: {}", v1, v2),
            Detail::Columns(diffs) => {
                for (i, d) in diffs.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "#{}: '{}' != '{}'", d.position + 1, d.v1, d.v2)?;
                }
                Ok(())
            }
            Detail::Types(diffs) => {
                for (i, d) in diffs.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}: {} != {}", d.column, d.v1, d.v2)?;
                }
                Ok(())
            }
            Detail::Empty => f.write_str("Headers only, no data rows"),
            Detail::Divergence {
                ratio,
                limit,
                basis,
            } => write!(
                f,
                "{:.2}% of {} differ (limit {:.2}%), scan stopped",
                ratio * 100.0,
                basis,
                limit * 100.0
            ),
            Detail::Differences { rows, cells } => {
                write!(f, "{} rows differ ({} cells)", rows, cells)
            }
        }
    }
}

/// Verdict for one sheet present in both files
#[derive(Debug, Clone, PartialEq)]
pub struct SheetOutcome {
    /// Sheet name
    pub name: String,
    /// Stage that decided the verdict
    pub stage: Stage,
    pub status: Status,
    pub detail: Detail,
    pub shape_v1: Shape,
    pub shape_v2: Shape,
    pub dtypes_v1: Vec<DataType>,
    pub dtypes_v2: Vec<DataType>,
    /// Row scan counters, present when the sheet reached the row data stage
    pub scan: Option<ScanStats>,
}

impl SheetOutcome {
    /// Share of matching cells, when the sheet got as far as its data
    pub fn match_rate(&self) -> Option<f64> {
        match (&self.scan, self.status) {
            (Some(stats), _) => Some(stats.match_rate()),
            (None, Status::EmptyMatch) => Some(1.0),
            _ => None,
        }
    }
}

/// Verdict for a pair of files
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonOutcome {
    /// Stage that decided the verdict
    pub stage: Stage,
    pub status: Status,
    pub detail: Detail,
    /// Sheet that decided the verdict, when it came from a sheet stage
    pub sheet: Option<String>,
    /// Per-sheet verdicts, in V1 sheet order
    pub sheets: Vec<SheetOutcome>,
}

impl ComparisonOutcome {
    /// A verdict reached before any sheet was compared
    pub fn pair_level(stage: Stage, status: Status, detail: Detail) -> Self {
        Self {
            stage,
            status,
            detail,
            sheet: None,
            sheets: Vec::new(),
        }
    }

    /// Combine sheet verdicts into a pair verdict
    ///
    /// The first sheet with the most severe status decides. An empty match of
    /// the whole pair counts as a perfect match.
    pub fn from_sheets(sheets: Vec<SheetOutcome>) -> Self {
        let mut worst: Option<&SheetOutcome> = None;
        for sheet in &sheets {
            if worst.map_or(true, |w| sheet.status > w.status) {
                worst = Some(sheet);
            }
        }

        let (stage, status, detail, sheet) = match worst {
            Some(w) if !w.status.is_match() => {
                (w.stage, w.status, w.detail.clone(), Some(w.name.clone()))
            }
            Some(w) => (w.stage, Status::PerfectMatch, Detail::None, None),
            None => (Stage::Sheets, Status::PerfectMatch, Detail::None, None),
        };

        Self {
            stage,
            status,
            detail,
            sheet,
            sheets,
        }
    }

    /// Whether the pair is considered equal
    pub fn is_match(&self) -> bool {
        self.status.is_match()
    }

    /// Share of matching cells over every sheet that got as far as its data
    ///
    /// `None` when no sheet was compared that far.
    pub fn match_rate(&self) -> Option<f64> {
        let mut reached = false;
        let mut scanned = 0usize;
        let mut mismatched = 0usize;
        for sheet in &self.sheets {
            if let Some(stats) = &sheet.scan {
                reached = true;
                scanned += stats.cells_scanned;
                mismatched += stats.mismatched_cells;
            } else if sheet.status == Status::EmptyMatch {
                reached = true;
            }
        }

        if !reached {
            None
        } else if scanned == 0 {
            Some(1.0)
        } else {
            Some(1.0 - mismatched as f64 / scanned as f64)
        }
    }
}
