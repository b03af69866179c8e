//! Row-level data comparison
//!
//! Both differs walk the two tables in lockstep, row index against row index, and
//! stop as soon as the running mismatch ratio exceeds the abort ratio. The ratio is
//! always taken against the full table size, so an abort after `n` mismatched rows
//! happens at the same row index no matter how the remaining rows look.
//!
//! [`FingerprintDiffer`] differs from [`PerCellDiffer`] only in that it skips rows
//! whose fingerprints match. It reports exactly the same cell differences.

use std::fmt;

use sheetcmp_core::{CellValue, DataType, Shape, Table};
use tracing::trace;

use crate::config::{CompareConfig, MismatchBasis};
use crate::fingerprint::RowHasher;

/// One differing cell
#[derive(Debug, Clone, PartialEq)]
pub struct CellDiff {
    /// Zero-based data row index (header excluded)
    pub row_index: usize,
    /// Name of the column holding the cell
    pub column_name: String,
    /// Type of that column
    pub column_type: DataType,
    /// Value in the first table
    pub value_v1: CellValue,
    /// Value in the second table
    pub value_v2: CellValue,
}

/// Counters collected while scanning rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanStats {
    /// Size of the tables being compared
    pub shape: Shape,
    /// Rows visited, skipped rows included
    pub rows_scanned: usize,
    /// Cells in the visited rows
    pub cells_scanned: usize,
    /// Cells actually compared one by one
    pub cells_compared: usize,
    /// Visited rows with at least one differing cell
    pub mismatched_rows: usize,
    /// Differing cells found
    pub mismatched_cells: usize,
}

impl ScanStats {
    fn new(shape: Shape) -> Self {
        Self {
            shape,
            ..Self::default()
        }
    }

    /// Share of visited cells that matched
    pub fn match_rate(&self) -> f64 {
        if self.cells_scanned == 0 {
            1.0
        } else {
            1.0 - self.mismatched_cells as f64 / self.cells_scanned as f64
        }
    }

    /// Whether the scan stopped before the last row
    pub fn is_partial(&self) -> bool {
        self.rows_scanned < self.shape.rows
    }

    /// Mismatch ratio over the full table size
    pub fn mismatch_ratio(&self, basis: MismatchBasis) -> f64 {
        let (mismatched, total) = match basis {
            MismatchBasis::Rows => (self.mismatched_rows, self.shape.rows),
            MismatchBasis::Cells => (self.mismatched_cells, self.shape.cell_count()),
        };
        if total == 0 {
            0.0
        } else {
            mismatched as f64 / total as f64
        }
    }
}

/// Result of a row scan
#[derive(Debug, Clone, PartialEq)]
pub enum RowDiffResult {
    /// Every cell matched
    PerfectMatch { stats: ScanStats },
    /// The mismatch ratio crossed the abort ratio and the scan stopped
    MassiveDivergence { ratio: f64, stats: ScanStats },
    /// Some cells differ, never more than the abort ratio allows
    DataMismatch { diffs: Vec<CellDiff>, stats: ScanStats },
}

impl RowDiffResult {
    /// Scan counters
    pub fn stats(&self) -> &ScanStats {
        match self {
            RowDiffResult::PerfectMatch { stats }
            | RowDiffResult::MassiveDivergence { stats, .. }
            | RowDiffResult::DataMismatch { stats, .. } => stats,
        }
    }

    /// Cell differences, empty unless the result is a data mismatch
    pub fn diffs(&self) -> &[CellDiff] {
        match self {
            RowDiffResult::DataMismatch { diffs, .. } => diffs,
            _ => &[],
        }
    }
}

/// Which row differ to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    /// Compare every cell
    PerCell,
    /// Skip rows with matching fingerprints
    Fingerprint,
}

impl fmt::Display for DiffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiffMode::PerCell => "per-cell",
            DiffMode::Fingerprint => "fingerprint",
        })
    }
}

/// Compares the data rows of two tables
///
/// Callers guarantee that both tables have the same shape, column names and
/// column types, and at least one data row.
pub trait RowDiffer: Send + Sync {
    /// Scan both tables and report how their rows differ
    fn diff(&self, v1: &Table, v2: &Table) -> RowDiffResult;

    /// The strategy this differ implements
    fn mode(&self) -> DiffMode;
}

/// Pick the differ matching `config.hash_mode`
pub fn differ_for(config: &CompareConfig) -> Box<dyn RowDiffer> {
    let threshold = AbortThreshold::from_config(config);
    if config.hash_mode {
        Box::new(FingerprintDiffer::new(threshold))
    } else {
        Box::new(PerCellDiffer::new(threshold))
    }
}

/// When to give up on a row scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbortThreshold {
    /// Ratio that must be exceeded to abort
    pub ratio: f64,
    /// What the ratio counts
    pub basis: MismatchBasis,
}

impl AbortThreshold {
    /// Take the threshold from a configuration
    pub fn from_config(config: &CompareConfig) -> Self {
        Self {
            ratio: config.mismatch_abort_ratio,
            basis: config.mismatch_basis,
        }
    }

    fn exceeded(&self, stats: &ScanStats) -> Option<f64> {
        let ratio = stats.mismatch_ratio(self.basis);
        (ratio > self.ratio).then_some(ratio)
    }
}

impl Default for AbortThreshold {
    fn default() -> Self {
        Self::from_config(&CompareConfig::default())
    }
}

/// Compares every cell of every row
#[derive(Debug, Clone, Default)]
pub struct PerCellDiffer {
    threshold: AbortThreshold,
}

impl PerCellDiffer {
    /// Create a differ with the given abort threshold
    pub fn new(threshold: AbortThreshold) -> Self {
        Self { threshold }
    }
}

impl RowDiffer for PerCellDiffer {
    fn diff(&self, v1: &Table, v2: &Table) -> RowDiffResult {
        scan_rows(v1, v2, self.threshold, |_, _| false)
    }

    fn mode(&self) -> DiffMode {
        DiffMode::PerCell
    }
}

/// Skips rows with matching fingerprints
///
/// Fingerprints are computed one row pair at a time as the scan reaches it, so an
/// aborted scan never touches the rows after the abort point.
#[derive(Debug, Clone, Default)]
pub struct FingerprintDiffer {
    threshold: AbortThreshold,
    hasher: RowHasher,
}

impl FingerprintDiffer {
    /// Create a differ with the given abort threshold
    pub fn new(threshold: AbortThreshold) -> Self {
        Self {
            threshold,
            hasher: RowHasher::new(),
        }
    }
}

impl RowDiffer for FingerprintDiffer {
    fn diff(&self, v1: &Table, v2: &Table) -> RowDiffResult {
        scan_rows(v1, v2, self.threshold, |r1, r2| {
            self.hasher.fingerprint(r1) == self.hasher.fingerprint(r2)
        })
    }

    fn mode(&self) -> DiffMode {
        DiffMode::Fingerprint
    }
}

/// Walk both tables in lockstep, skipping rows for which `skip` returns true
fn scan_rows<F>(v1: &Table, v2: &Table, threshold: AbortThreshold, skip: F) -> RowDiffResult
where
    F: Fn(&[CellValue], &[CellValue]) -> bool,
{
    let columns = v1.columns();
    let mut stats = ScanStats::new(v1.shape());
    let mut diffs = Vec::new();

    for (row_index, (r1, r2)) in v1.rows().zip(v2.rows()).enumerate() {
        stats.rows_scanned += 1;
        stats.cells_scanned += columns.len();

        if skip(r1, r2) {
            continue;
        }

        let before = diffs.len();
        for ((column, a), b) in columns.iter().zip(r1).zip(r2) {
            stats.cells_compared += 1;
            if a != b {
                diffs.push(CellDiff {
                    row_index,
                    column_name: column.name.clone(),
                    column_type: column.dtype,
                    value_v1: a.clone(),
                    value_v2: b.clone(),
                });
            }
        }

        let found = diffs.len() - before;
        if found == 0 {
            continue;
        }
        stats.mismatched_rows += 1;
        stats.mismatched_cells += found;

        if let Some(ratio) = threshold.exceeded(&stats) {
            trace!(row_index, ratio, "mismatch ratio exceeded, stopping scan");
            return RowDiffResult::MassiveDivergence { ratio, stats };
        }
    }

    if diffs.is_empty() {
        RowDiffResult::PerfectMatch { stats }
    } else {
        RowDiffResult::DataMismatch { diffs, stats }
    }
}
