//! Configuration types for word tokenization.
//!
//! [`TokenizeConfig`] controls how a document byte stream is split into
//! words. Byte classification itself is fixed (ASCII letters and digits, plus
//! an apostrophe after the first byte of a word); the knobs here only cover
//! case folding and the per-token size guard.
//!
//! # Versioning
//!
//! Any change that can alter the token sequence for the same bytes must be
//! accompanied by a `version` bump, so fingerprints computed by older builds
//! remain distinguishable.
//!
//! # Examples
//!
//! ```rust
//! use canonical::TokenizeConfig;
//!
//! let config = TokenizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(!config.lowercase);
//!
//! let folded = TokenizeConfig::default().with_lowercase(true);
//! assert!(folded.lowercase);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Default upper bound on the byte length of a single token.
pub const DEFAULT_MAX_TOKEN_BYTES: usize = 64 * 1024;

/// Configuration for the word tokenizer.
///
/// # Serialization
///
/// ```json
/// {
///   "version": 1,
///   "lowercase": false,
///   "max_token_bytes": 65536
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TokenizeConfig {
    /// Tokenizer behavior version. Must be >= 1.
    pub version: u32,
    /// Fold ASCII letters to lowercase before they are emitted.
    ///
    /// Disabled by default: `Fox` and `fox` are distinct words, so they yield
    /// distinct shingles.
    pub lowercase: bool,
    /// Maximum byte length of a single token.
    ///
    /// A run of word bytes longer than this is rejected with
    /// [`CanonicalError::TokenTooLong`] instead of growing without bound.
    pub max_token_bytes: usize,
}

impl TokenizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    pub fn with_max_token_bytes(mut self, max_token_bytes: usize) -> Self {
        self.max_token_bytes = max_token_bytes;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "version must be >= 1".into(),
            ));
        }
        if self.max_token_bytes == 0 {
            return Err(CanonicalError::InvalidConfig(
                "max_token_bytes must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for TokenizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            lowercase: false,
            max_token_bytes: DEFAULT_MAX_TOKEN_BYTES,
        }
    }
}
