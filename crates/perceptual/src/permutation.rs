//! Permutation rows for minimum-hash estimation.
//!
//! Every fingerprint seeds its own SplitMix64 stream; the `j`-th draw of that
//! stream plays the role of the `j`-th independent hash function applied to
//! the fingerprint. A document's rows stacked together form its permutation
//! matrix, and the estimator only ever needs the per-column minima of it.
//!
//! SplitMix64 (Steele, Lea & Flood) is fully specified by the constants
//! below, so a given fingerprint expands to the same row on every platform.
//! Draw `j` (0-based) of the stream seeded with `v` is
//! `splitmix64(v + j * GAMMA)`, which makes any column directly addressable.

use rayon::prelude::*;

/// SplitMix64 state increment (the 64-bit golden ratio).
pub const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

// Fingerprints per rayon task when folding column minima in parallel.
const PAR_CHUNK: usize = 64;

/// Deterministic, seedable SplitMix64 generator.
#[derive(Debug, Clone)]
pub struct PermutationRng {
    state: u64,
}

impl PermutationRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GAMMA);
        mix(self.state)
    }

    /// The `j`-th draw of the stream seeded with `seed`, without stepping.
    #[inline]
    pub fn nth_draw(seed: u64, j: u64) -> u64 {
        splitmix64(seed.wrapping_add(j.wrapping_mul(GAMMA)))
    }
}

impl Iterator for PermutationRng {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        Some(self.next_u64())
    }
}

/// A 64-bit hash function that is fast and has good distribution.
#[inline]
pub fn splitmix64(x: u64) -> u64 {
    mix(x.wrapping_add(GAMMA))
}

#[inline]
fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Expand one fingerprint into its row of `permutations` draws.
pub fn permutation_row(fingerprint: u64, permutations: usize) -> Vec<u64> {
    PermutationRng::new(fingerprint).take(permutations).collect()
}

/// Materialized `rows x permutations` matrix for one document.
///
/// Row `i` is [`permutation_row`] of fingerprint `i`. Storage is row-major in
/// a single allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationMatrix {
    values: Vec<u64>,
    rows: usize,
    permutations: usize,
}

impl PermutationMatrix {
    pub fn build(fingerprints: &[u64], permutations: usize) -> Self {
        let mut values = Vec::with_capacity(fingerprints.len() * permutations);
        for &fp in fingerprints {
            values.extend(PermutationRng::new(fp).take(permutations));
        }
        Self {
            values,
            rows: fingerprints.len(),
            permutations,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn permutations(&self) -> usize {
        self.permutations
    }

    pub fn row(&self, i: usize) -> Option<&[u64]> {
        if i >= self.rows {
            return None;
        }
        let start = i * self.permutations;
        Some(&self.values[start..start + self.permutations])
    }

    pub fn get(&self, i: usize, j: usize) -> Option<u64> {
        self.row(i).and_then(|row| row.get(j).copied())
    }

    /// Minimum of column `j`, or `None` for an empty matrix or out of range `j`.
    pub fn column_min(&self, j: usize) -> Option<u64> {
        if j >= self.permutations {
            return None;
        }
        (0..self.rows).filter_map(|i| self.get(i, j)).min()
    }

    /// Per-column minima, or `None` when the matrix has no rows.
    pub fn column_minima(&self) -> Option<Vec<u64>> {
        if self.rows == 0 {
            return None;
        }
        let mut mins = vec![u64::MAX; self.permutations];
        for row in self.values.chunks_exact(self.permutations.max(1)) {
            fold_min(&mut mins, row.iter().copied());
        }
        Some(mins)
    }
}

/// Column minima of the permutation matrix of `fingerprints`, streamed.
///
/// Produces exactly [`PermutationMatrix::column_minima`] while holding only
/// one `permutations`-wide accumulator per worker. Rows are independent, so
/// with `parallel` set they are folded on the rayon pool and merged with an
/// element-wise minimum. Returns `None` when `fingerprints` is empty.
pub fn column_minima(fingerprints: &[u64], permutations: usize, parallel: bool) -> Option<Vec<u64>> {
    if fingerprints.is_empty() {
        return None;
    }

    if parallel && fingerprints.len() > PAR_CHUNK {
        fingerprints
            .par_chunks(PAR_CHUNK)
            .map(|chunk| fold_rows(chunk, permutations))
            .reduce_with(|mut left, right| {
                fold_min(&mut left, right.into_iter());
                left
            })
    } else {
        Some(fold_rows(fingerprints, permutations))
    }
}

fn fold_rows(fingerprints: &[u64], permutations: usize) -> Vec<u64> {
    let mut mins = vec![u64::MAX; permutations];
    for &fp in fingerprints {
        fold_min(&mut mins, PermutationRng::new(fp));
    }
    mins
}

#[inline]
fn fold_min(mins: &mut [u64], row: impl Iterator<Item = u64>) {
    for (slot, value) in mins.iter_mut().zip(row) {
        if value < *slot {
            *slot = value;
        }
    }
}
