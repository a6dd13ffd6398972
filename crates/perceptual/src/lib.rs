//! # docsim Fingerprinting
//!
//! This crate turns a document's word sequence into the fingerprint sequence
//! and permutation rows that the similarity estimator consumes.
//!
//! ## Contract
//!
//! - The layer **only** consumes tokens produced upstream; it never reads
//!   files or decides what a word is.
//! - The API is a pure function of `(tokens, shingle_length, seed)` with no
//!   I/O and no global state. The seed is an explicit argument, scoped to the
//!   comparison that supplies it.
//!
//! Invariant: for the same tokens, shingle length and seed, the fingerprint
//! sequence is bit identical on every platform.
//!
//! ## Core Pipeline
//!
//! 1.  **Shingling**: a ring buffer of the last `shingle_length` tokens emits
//!     the concatenation of the window for every token once it is warm, so
//!     `n` tokens give `n - shingle_length + 1` shingles.
//!
//! 2.  **Fingerprinting**: each shingle's bytes are hashed with MurmurHash64A
//!     under the comparison seed. Duplicates are kept.
//!
//! 3.  **Permutation**: each fingerprint seeds a SplitMix64 stream whose first
//!     `permutations` draws form that fingerprint's row. Only the column minima
//!     of the stacked rows matter to the estimator, and they can be folded
//!     without materializing the matrix (optionally in parallel via Rayon).
//!
//! ## Example Usage
//!
//! ```
//! use perceptual::{fingerprint_document, PerceptualError};
//!
//! let doc = fingerprint_document(["the", "quick", "brown", "fox"], 2, 42).unwrap();
//! assert_eq!(doc.len(), 3);
//! assert_eq!(doc.seed(), 42);
//!
//! let err = fingerprint_document(["alone"], 2, 42).unwrap_err();
//! assert!(matches!(err, PerceptualError::EmptyInput { .. }));
//! ```
//!
pub mod config;
pub mod fingerprint;
mod murmur;
mod permutation;
mod shingles;

use std::time::Instant;

use tracing::{debug, warn};

pub use crate::config::{PerceptualConfig, PerceptualError, DEFAULT_SHINGLE_LENGTH};
pub use crate::fingerprint::{DocumentFingerprint, FingerprintMeta, Fingerprinter};
pub use crate::murmur::hash64;
pub use crate::permutation::{
    column_minima, permutation_row, splitmix64, PermutationMatrix, PermutationRng, GAMMA,
};
pub use crate::shingles::{make_shingles, ShingleWindow};

/// Current fingerprint algorithm version for this crate.
pub const PERCEPTUAL_VERSION: u16 = 1;

/// Human-readable algorithm identifier.
pub const PERCEPTUAL_ALGORITHM: &str = "shingle_murmur64a_v1";

/// Fingerprint a token sequence with an explicit shingle length and seed.
///
/// Fails with [`PerceptualError::InvalidShingleLength`] for a zero window and
/// [`PerceptualError::EmptyInput`] when the tokens produce no shingle.
pub fn fingerprint_document<I, S>(
    tokens: I,
    shingle_length: usize,
    seed: u64,
) -> Result<DocumentFingerprint, PerceptualError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let start = Instant::now();
    let mut builder = Fingerprinter::new(shingle_length, seed)?;
    for token in tokens {
        builder.push(token.as_ref());
    }
    let token_count = builder.token_count();

    match builder.finish() {
        Ok(doc) => {
            debug!(
                tokens = token_count,
                shingles = doc.len(),
                shingle_length,
                elapsed_micros = start.elapsed().as_micros(),
                "fingerprint_success"
            );
            Ok(doc)
        }
        Err(err) => {
            warn!(tokens = token_count, shingle_length, error = %err, "fingerprint_failure");
            Err(err)
        }
    }
}

/// Fingerprint a token slice using a validated [`PerceptualConfig`].
pub fn fingerprint_tokens<S>(
    tokens: &[S],
    cfg: &PerceptualConfig,
) -> Result<DocumentFingerprint, PerceptualError>
where
    S: AsRef<str>,
{
    cfg.validate()?;
    fingerprint_document(tokens, cfg.shingle_length, cfg.seed)
}
