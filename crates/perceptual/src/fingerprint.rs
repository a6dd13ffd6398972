//! Fingerprint types and the streaming fingerprint builder.
//!
//! A [`DocumentFingerprint`] is the ordered sequence of shingle hashes of one
//! document, duplicates included, together with the metadata needed to tell
//! whether two fingerprints are comparable (same seed, same shingle length).

use serde::{Deserialize, Serialize};

use crate::config::PerceptualError;
use crate::murmur::hash64;
use crate::shingles::ShingleWindow;
use crate::{PERCEPTUAL_ALGORITHM, PERCEPTUAL_VERSION};

/// Ordered shingle fingerprints of one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentFingerprint {
    /// One MurmurHash64A value per shingle, in document order.
    pub hashes: Vec<u64>,
    /// How and under which seed the hashes were produced.
    pub meta: FingerprintMeta,
}

impl DocumentFingerprint {
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn seed(&self) -> u64 {
        self.meta.seed
    }
}

/// Metadata for traceability and comparability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FingerprintMeta {
    /// Fingerprint algorithm version, bumped whenever hashes can change.
    pub perceptual_version: u16,
    /// Human-readable algorithm identifier.
    pub algorithm_name: String,
    /// Tokens per shingle.
    pub shingle_length: usize,
    /// Seed the shingles were hashed under.
    pub seed: u64,
    /// Tokens consumed from the document.
    pub token_count: usize,
}

/// Incremental fingerprint builder.
///
/// Feed tokens one at a time with [`push`](Self::push); each token that
/// completes a shingle is hashed immediately, so no shingle text outlives the
/// push that produced it.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    window: ShingleWindow,
    seed: u64,
    hashes: Vec<u64>,
}

impl Fingerprinter {
    pub fn new(shingle_length: usize, seed: u64) -> Result<Self, PerceptualError> {
        Ok(Self {
            window: ShingleWindow::new(shingle_length)?,
            seed,
            hashes: Vec::new(),
        })
    }

    pub fn push(&mut self, token: &str) {
        if let Some(shingle) = self.window.push(token) {
            self.hashes.push(hash64(shingle.as_bytes(), self.seed));
        }
    }

    pub fn token_count(&self) -> usize {
        self.window.tokens_seen()
    }

    /// Finish the document.
    ///
    /// Fails with [`PerceptualError::EmptyInput`] when fewer tokens than the
    /// shingle length were pushed.
    pub fn finish(self) -> Result<DocumentFingerprint, PerceptualError> {
        let shingle_length = self.window.capacity();
        let token_count = self.window.tokens_seen();
        if self.hashes.is_empty() {
            return Err(PerceptualError::EmptyInput {
                tokens: token_count,
                shingle_length,
            });
        }
        Ok(DocumentFingerprint {
            hashes: self.hashes,
            meta: FingerprintMeta {
                perceptual_version: PERCEPTUAL_VERSION,
                algorithm_name: PERCEPTUAL_ALGORITHM.to_string(),
                shingle_length,
                seed: self.seed,
                token_count,
            },
        })
    }
}
