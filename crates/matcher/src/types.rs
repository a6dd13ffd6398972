use std::fmt;

use perceptual::PerceptualError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of permutation columns per comparison.
pub const DEFAULT_PERMUTATIONS: usize = 4000;

/// Default number of repetitions for the averaging variant.
pub const DEFAULT_RUNS: usize = 5;

/// Configuration for similarity estimation.
///
/// `MatchConfig` is cheap to clone and serde-friendly so it can be embedded in
/// higher-level configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchConfig {
    /// Configuration schema version.
    #[serde(default = "MatchConfig::default_version")]
    pub version: u32,
    /// Number of simulated hash functions (permutation columns).
    ///
    /// The estimator's standard error shrinks with `1 / sqrt(permutations)`.
    #[serde(default = "MatchConfig::default_permutations")]
    pub permutations: usize,
    /// Repetitions for [`crate::average_runs`], each under a fresh seed.
    #[serde(default = "MatchConfig::default_runs")]
    pub runs: usize,
    /// Fold permutation rows on the rayon pool.
    #[serde(default)]
    pub use_parallel: bool,
}

impl MatchConfig {
    pub(crate) fn default_version() -> u32 {
        1
    }

    pub(crate) fn default_permutations() -> usize {
        DEFAULT_PERMUTATIONS
    }

    pub(crate) fn default_runs() -> usize {
        DEFAULT_RUNS
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_permutations(mut self, permutations: usize) -> Self {
        self.permutations = permutations;
        self
    }

    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), MatchError> {
        self.validate_estimator()?;
        if self.runs == 0 {
            return Err(MatchError::InvalidConfig(
                "runs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Validate only the fields a single comparison reads.
    ///
    /// `runs` is ignored; it matters only to [`crate::average_runs`].
    pub fn validate_estimator(&self) -> Result<(), MatchError> {
        if self.version == 0 {
            return Err(MatchError::InvalidConfig(
                "version must be >= 1".into(),
            ));
        }
        if self.permutations == 0 {
            return Err(MatchError::InvalidConfig(
                "permutations must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            permutations: Self::default_permutations(),
            runs: Self::default_runs(),
            use_parallel: false,
        }
    }
}

/// Result of one comparison: matching minimums over calculated minimums.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Similarity {
    /// Columns whose minima coincided.
    pub matches: usize,
    /// Columns compared.
    pub permutations: usize,
    /// `matches / permutations`, in `[0, 1]`.
    pub score: f64,
}

impl Similarity {
    pub(crate) fn from_counts(matches: usize, permutations: usize) -> Self {
        Self {
            matches,
            permutations,
            score: matches as f64 / permutations as f64,
        }
    }
}

/// One repetition of an averaged comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    /// 1-based run number.
    pub run: usize,
    /// Seed both documents were fingerprinted under in this run.
    pub seed: u64,
    pub similarity: Similarity,
}

/// Mean and per-run scores of a repeated comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AveragedSimilarity {
    pub runs: Vec<RunReport>,
    pub mean: f64,
}

impl AveragedSimilarity {
    /// Per-run scores in run order.
    pub fn scores(&self) -> Vec<f64> {
        self.runs.iter().map(|r| r.similarity.score).collect()
    }
}

/// Outcome of one pairing inside a batch comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchHit<K> {
    /// Caller-supplied identifier of the other document.
    pub key: K,
    pub outcome: Result<Similarity, MatchError>,
}

/// Which side of a comparison an error refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Errors produced by the similarity layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Invalid configuration.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
    /// One side has no fingerprints, so its column minima are undefined.
    #[error("empty input: {side} document has no fingerprints")]
    EmptyInput { side: Side },
    /// The two sides were fingerprinted under different seeds.
    #[error("seed mismatch: left fingerprinted with {left:#x}, right with {right:#x}")]
    SeedMismatch { left: u64, right: u64 },
    /// The two sides were shingled with different window sizes.
    #[error("shingle length mismatch: left {left}, right {right}")]
    ShingleLengthMismatch { left: usize, right: usize },
    /// Fingerprinting failed while preparing a run.
    #[error("perceptual error: {0}")]
    Perceptual(#[from] PerceptualError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = MatchConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.permutations, 4000);
        assert_eq!(cfg.runs, 5);
        assert!(!cfg.use_parallel);
    }

    #[test]
    fn zero_permutations_rejected() {
        let cfg = MatchConfig::new().with_permutations(0);
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains("permutations")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn estimator_check_ignores_runs() {
        let cfg = MatchConfig::new().with_runs(0);
        assert!(cfg.validate_estimator().is_ok());
        assert!(cfg.clone().with_permutations(0).validate_estimator().is_err());
    }

    #[test]
    fn zero_runs_rejected() {
        let cfg = MatchConfig::new().with_runs(0);
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains("runs")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: MatchConfig = serde_json::from_str(r#"{"permutations": 128}"#).unwrap();
        assert_eq!(cfg.permutations, 128);
        assert_eq!(cfg.runs, DEFAULT_RUNS);
        assert_eq!(cfg.version, 1);
    }

    #[test]
    fn similarity_ratio() {
        let sim = Similarity::from_counts(1000, 4000);
        assert_eq!(sim.score, 0.25);
    }

    #[test]
    fn error_messages_name_the_side() {
        let err = MatchError::EmptyInput { side: Side::Right };
        assert!(err.to_string().contains("right document"));
    }
}
