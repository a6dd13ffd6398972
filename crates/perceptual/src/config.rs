//! Configuration and error types for docsim fingerprinting.
//!
//! This module defines the public configuration surface for the shingling
//! layer. It is intentionally free of any I/O or environment-dependent
//! behavior so that fingerprinting is a pure function of
//! `(tokens, config)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of tokens per shingle.
pub const DEFAULT_SHINGLE_LENGTH: usize = 2;

/// Configuration for shingling and fingerprinting one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PerceptualConfig {
    /// Configuration schema version.
    ///
    /// Any algorithmic change that can affect fingerprints must bump this
    /// version, so that old fingerprints remain distinguishable.
    pub version: u32,
    /// Number of consecutive tokens per shingle.
    ///
    /// Larger values are more sensitive to word order; smaller values
    /// tolerate reordering but match more incidental phrases.
    pub shingle_length: usize,
    /// Seed for shingle fingerprinting.
    ///
    /// Both sides of one comparison must be fingerprinted under the same
    /// seed. Callers that average several runs replace it between runs.
    pub seed: u64,
}

impl PerceptualConfig {
    /// Create a new configuration with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shingle length in tokens.
    pub fn with_shingle_length(mut self, shingle_length: usize) -> Self {
        self.shingle_length = shingle_length;
        self
    }

    /// Set the fingerprint seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), PerceptualError> {
        if self.version < 1 {
            return Err(PerceptualError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.shingle_length < 1 {
            return Err(PerceptualError::InvalidShingleLength {
                shingle_length: self.shingle_length,
            });
        }
        Ok(())
    }
}

impl Default for PerceptualConfig {
    fn default() -> Self {
        Self {
            version: 1,
            shingle_length: DEFAULT_SHINGLE_LENGTH,
            seed: 0xF00D_BAAD_F00D_BAAD,
        }
    }
}

/// Errors returned by the fingerprinting stage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PerceptualError {
    #[error("empty input: {tokens} token(s) cannot form a shingle of length {shingle_length}")]
    EmptyInput { tokens: usize, shingle_length: usize },

    #[error("invalid config: shingle_length must be >= 1 (got {shingle_length})")]
    InvalidShingleLength { shingle_length: usize },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = PerceptualConfig::default();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.shingle_length, 2);
        assert_eq!(cfg.seed, 0xF00D_BAAD_F00D_BAAD);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let cfg = PerceptualConfig::new().with_shingle_length(3).with_seed(42);
        assert_eq!(cfg.shingle_length, 3);
        assert_eq!(cfg.seed, 42);
    }

    #[test]
    fn config_validate_zero_shingle_length() {
        let cfg = PerceptualConfig::new().with_shingle_length(0);
        assert!(matches!(
            cfg.validate(),
            Err(PerceptualError::InvalidShingleLength { shingle_length: 0 })
        ));
    }

    #[test]
    fn config_validate_zero_version() {
        let cfg = PerceptualConfig {
            version: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(PerceptualError::InvalidConfigVersion { version: 0 })
        ));
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = PerceptualConfig::new().with_shingle_length(4).with_seed(12345);
        let serialized = serde_json::to_string(&cfg).unwrap();
        let deserialized: PerceptualConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(cfg, deserialized);
    }

    #[test]
    fn error_display_empty_input() {
        let err = PerceptualError::EmptyInput {
            tokens: 1,
            shingle_length: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("empty input"));
        assert!(msg.contains("length 2"));
    }
}
