//! # docsim Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` estimates how similar two fingerprinted documents are. Each
//! document's fingerprints are expanded into permutation rows; the estimate is
//! the fraction of permutation columns in which both documents share the same
//! column minimum. With enough columns this approximates the Jaccard index of
//! the two shingle sets.
//!
//! ## Core Types
//!
//! - [`MatchConfig`]: permutation count, averaging runs and the parallel switch.
//! - [`Similarity`]: matching columns, columns compared and their ratio.
//! - [`ColumnMinima`]: one document's folded permutation minima, reusable
//!   across pairings.
//! - [`BatchComparer`] / [`compare_batch`]: one subject against many documents.
//! - [`average_runs`]: repeat a comparison under fresh seeds and report the
//!   mean alongside each run.
//! - [`SeedSource`]: where per-run seeds come from ([`RandomSeeds`] for real
//!   use, [`FixedSeeds`] for replay).
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{compare, MatchError};
//! use perceptual::fingerprint_document;
//!
//! let a = fingerprint_document(["the", "quick", "brown", "fox"], 2, 7).unwrap();
//! let b = fingerprint_document(["the", "quick", "brown", "dog"], 2, 7).unwrap();
//!
//! let score = compare(&a, &b, 4000).unwrap();
//! assert!((0.0..=1.0).contains(&score));
//! assert_eq!(compare(&a, &a, 4000).unwrap(), 1.0);
//!
//! let c = fingerprint_document(["the", "quick"], 2, 8).unwrap();
//! assert!(matches!(compare(&a, &c, 10), Err(MatchError::SeedMismatch { .. })));
//! ```

pub mod engine;
pub mod seeds;
pub mod types;

pub use crate::engine::{
    average_runs, compare, compare_batch, compare_hashes, compare_with_config, BatchComparer,
    ColumnMinima,
};
pub use crate::seeds::{FixedSeeds, RandomSeeds, SeedSource};
pub use crate::types::{
    AveragedSimilarity, BatchHit, MatchConfig, MatchError, RunReport, Side, Similarity,
    DEFAULT_PERMUTATIONS, DEFAULT_RUNS,
};
