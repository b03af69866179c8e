//! Comparison settings

use std::fmt;
use std::str::FromStr;

use sheetcmp_core::MAX_ROWS;

use crate::error::{CompareError, CompareResult};

/// Default fraction of differing data above which a row scan is aborted
pub const DEFAULT_MISMATCH_ABORT_RATIO: f64 = 0.10;

/// Default row limit of one difference report sheet, header row included
pub const DEFAULT_MAX_ROWS_PER_SEGMENT: usize = MAX_ROWS as usize;

/// Rows of every report segment taken by the column header
pub const SEGMENT_HEADER_ROWS: usize = 1;

/// What the mismatch ratio counts
///
/// Under `Cells` a few changed cells in a wide sheet stay below the abort
/// ratio even when they touch more than a tenth of the rows, so a sheet is
/// only declared a massive divergence from its row count under `Rows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum MismatchBasis {
    /// Mismatched rows over total rows
    Rows,
    /// Mismatched cells over total cells
    #[default]
    Cells,
}

impl fmt::Display for MismatchBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MismatchBasis::Rows => "rows",
            MismatchBasis::Cells => "cells",
        })
    }
}

impl FromStr for MismatchBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rows" | "row" => Ok(MismatchBasis::Rows),
            "cells" | "cell" => Ok(MismatchBasis::Cells),
            other => Err(format!(
                "unknown mismatch basis '{}' (expected 'rows' or 'cells')",
                other
            )),
        }
    }
}

/// Settings for one comparison session
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CompareConfig {
    /// Skip rows whose content fingerprints match before comparing cells
    pub hash_mode: bool,
    /// Abort a row scan once the mismatch ratio exceeds this value
    pub mismatch_abort_ratio: f64,
    /// Whether the ratio counts rows or cells
    pub mismatch_basis: MismatchBasis,
    /// Row limit of one report sheet, header row included
    pub max_rows_per_segment: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            hash_mode: false,
            mismatch_abort_ratio: DEFAULT_MISMATCH_ABORT_RATIO,
            mismatch_basis: MismatchBasis::default(),
            max_rows_per_segment: DEFAULT_MAX_ROWS_PER_SEGMENT,
        }
    }
}

impl CompareConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable fingerprint row skipping
    pub fn with_hash_mode(mut self, enabled: bool) -> Self {
        self.hash_mode = enabled;
        self
    }

    /// Set the abort ratio
    pub fn with_mismatch_abort_ratio(mut self, ratio: f64) -> Self {
        self.mismatch_abort_ratio = ratio;
        self
    }

    /// Set what the abort ratio counts
    pub fn with_mismatch_basis(mut self, basis: MismatchBasis) -> Self {
        self.mismatch_basis = basis;
        self
    }

    /// Set the row limit of one report sheet
    pub fn with_max_rows_per_segment(mut self, rows: usize) -> Self {
        self.max_rows_per_segment = rows;
        self
    }

    /// Number of difference records that fit in one report segment
    pub fn segment_capacity(&self) -> usize {
        self.max_rows_per_segment.saturating_sub(SEGMENT_HEADER_ROWS)
    }

    /// Check that every setting is in range
    pub fn validate(&self) -> CompareResult<()> {
        if !(0.0..=1.0).contains(&self.mismatch_abort_ratio) {
            return Err(CompareError::InvalidConfig(format!(
                "mismatch_abort_ratio must be within 0.0..=1.0, got {}",
                self.mismatch_abort_ratio
            )));
        }
        if self.segment_capacity() == 0 {
            return Err(CompareError::InvalidConfig(format!(
                "max_rows_per_segment must leave room for data below the header, got {}",
                self.max_rows_per_segment
            )));
        }
        if self.max_rows_per_segment > DEFAULT_MAX_ROWS_PER_SEGMENT {
            return Err(CompareError::InvalidConfig(format!(
                "max_rows_per_segment must not exceed the sheet row limit {}, got {}",
                MAX_ROWS, self.max_rows_per_segment
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompareConfig::default();
        assert!(!config.hash_mode);
        assert_eq!(config.mismatch_abort_ratio, 0.10);
        assert_eq!(config.mismatch_basis, MismatchBasis::Cells);
        assert_eq!(config.max_rows_per_segment, 1_048_576);
        assert_eq!(config.segment_capacity(), 1_048_575);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = CompareConfig::new().with_mismatch_abort_ratio(1.5);
        assert!(matches!(
            config.validate(),
            Err(CompareError::InvalidConfig(_))
        ));

        let config = CompareConfig::new().with_mismatch_abort_ratio(f64::NAN);
        assert!(config.validate().is_err());

        let config = CompareConfig::new().with_max_rows_per_segment(1);
        assert!(config.validate().is_err());

        let config = CompareConfig::new().with_max_rows_per_segment(2);
        assert!(config.validate().is_ok());

        let config = CompareConfig::new().with_max_rows_per_segment(1_048_577);
        assert!(matches!(
            config.validate(),
            Err(CompareError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_basis_from_str() {
        assert_eq!("rows".parse::<MismatchBasis>(), Ok(MismatchBasis::Rows));
        assert_eq!("Cells".parse::<MismatchBasis>(), Ok(MismatchBasis::Cells));
        assert!("columns".parse::<MismatchBasis>().is_err());
        assert_eq!(MismatchBasis::Rows.to_string(), "rows");
    }
}
