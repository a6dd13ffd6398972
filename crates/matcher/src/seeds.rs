//! Seed sources for repeated comparisons.
//!
//! A comparison is only meaningful when both documents are fingerprinted
//! under one seed, and the averaging variant draws a fresh seed per run. The
//! seed is handed out by a [`SeedSource`] owned by the caller rather than kept
//! in process-wide state.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Supplies the fingerprint seed for each independent comparison run.
pub trait SeedSource {
    fn next_seed(&mut self) -> u64;
}

/// Seeds drawn from a cryptographically seeded [`StdRng`].
#[derive(Debug, Clone)]
pub struct RandomSeeds {
    rng: StdRng,
}

impl RandomSeeds {
    /// Seed the generator from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible seed sequence, for replaying a previous session.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSeeds {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedSource for RandomSeeds {
    fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

/// Cycles through a fixed list of seeds. An empty list always yields `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSeeds {
    seeds: Vec<u64>,
    next: usize,
}

impl FixedSeeds {
    pub fn new(seeds: impl Into<Vec<u64>>) -> Self {
        Self {
            seeds: seeds.into(),
            next: 0,
        }
    }

    pub fn single(seed: u64) -> Self {
        Self::new(vec![seed])
    }
}

impl SeedSource for FixedSeeds {
    fn next_seed(&mut self) -> u64 {
        if self.seeds.is_empty() {
            return 0;
        }
        let seed = self.seeds[self.next % self.seeds.len()];
        self.next += 1;
        seed
    }
}
