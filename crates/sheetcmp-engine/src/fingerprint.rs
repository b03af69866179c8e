//! Row content fingerprints
//!
//! A fingerprint is a 64-bit hash over the values of one row. Two rows with equal
//! values always share a fingerprint, so a fingerprint match lets the row scan skip
//! the cell-by-cell comparison. Unequal fingerprints prove the rows differ; the
//! scan then compares cells to find out which ones.

use ahash::RandomState;
use sheetcmp_core::CellValue;

// Fixed seeds so both sides of a pair hash with the same function.
const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Hashes whole rows with a fixed-seed hasher
#[derive(Clone)]
pub struct RowHasher {
    state: RandomState,
}

impl RowHasher {
    /// Create a hasher with the shared fixed seeds
    pub fn new() -> Self {
        let [k0, k1, k2, k3] = SEEDS;
        Self {
            state: RandomState::with_seeds(k0, k1, k2, k3),
        }
    }

    /// Fingerprint a single row
    pub fn fingerprint(&self, row: &[CellValue]) -> u64 {
        self.state.hash_one(row)
    }
}

impl Default for RowHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RowHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowHasher").finish_non_exhaustive()
    }
}
