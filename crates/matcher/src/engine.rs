use std::time::Instant;

use perceptual::{column_minima, DocumentFingerprint};
use tracing::{debug, info, warn};

use crate::seeds::SeedSource;
use crate::types::{AveragedSimilarity, BatchHit, MatchConfig, MatchError, RunReport, Side, Similarity};


/// Column minima of one document's permutation matrix.
///
/// Computing these is the expensive half of a comparison, so the batch path
/// computes them once for the subject document and reuses them per pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMinima {
    mins: Vec<u64>,
    rows: usize,
    seed: u64,
    shingle_length: usize,
}

impl ColumnMinima {
    /// Fold the permutation rows of `fp` into per-column minima.
    pub fn compute(fp: &DocumentFingerprint, cfg: &MatchConfig) -> Result<Self, MatchError> {
        Self::compute_side(fp, cfg, Side::Left)
    }

    fn compute_side(
        fp: &DocumentFingerprint,
        cfg: &MatchConfig,
        side: Side,
    ) -> Result<Self, MatchError> {
        if cfg.permutations == 0 {
            return Err(MatchError::InvalidConfig(
                "permutations must be greater than zero".into(),
            ));
        }
        let mins = column_minima(&fp.hashes, cfg.permutations, cfg.use_parallel)
            .ok_or(MatchError::EmptyInput { side })?;
        Ok(Self {
            mins,
            rows: fp.len(),
            seed: fp.seed(),
            shingle_length: fp.meta.shingle_length,
        })
    }

    pub fn values(&self) -> &[u64] {
        &self.mins
    }

    pub fn permutations(&self) -> usize {
        self.mins.len()
    }

    /// Fingerprints folded into these minima.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Count the columns whose minima coincide with `other`'s.
    pub fn matching(&self, other: &ColumnMinima) -> Result<Similarity, MatchError> {
        if self.seed != other.seed {
            return Err(MatchError::SeedMismatch {
                left: self.seed,
                right: other.seed,
            });
        }
        if self.shingle_length != other.shingle_length {
            return Err(MatchError::ShingleLengthMismatch {
                left: self.shingle_length,
                right: other.shingle_length,
            });
        }
        if self.mins.len() != other.mins.len() {
            return Err(MatchError::InvalidConfig(format!(
                "permutation counts differ: {} vs {}",
                self.mins.len(),
                other.mins.len()
            )));
        }
        let matches = self
            .mins
            .iter()
            .zip(&other.mins)
            .filter(|(a, b)| a == b)
            .count();
        Ok(Similarity::from_counts(matches, self.mins.len()))
    }
}

/// Estimate the similarity of two fingerprinted documents.
///
/// Both fingerprints must come from the same seed and shingle length. The
/// score is the fraction of the `permutations` columns in which the two
/// documents' column minima are equal.
pub fn compare(
    left: &DocumentFingerprint,
    right: &DocumentFingerprint,
    permutations: usize,
) -> Result<f64, MatchError> {
    let cfg = MatchConfig::default().with_permutations(permutations);
    compare_with_config(left, right, &cfg).map(|sim| sim.score)
}

/// Like [`compare`], returning the full [`Similarity`] report.
pub fn compare_with_config(
    left: &DocumentFingerprint,
    right: &DocumentFingerprint,
    cfg: &MatchConfig,
) -> Result<Similarity, MatchError> {
    let start = Instant::now();
    let result = compare_inner(left, right, cfg);
    let elapsed_micros = start.elapsed().as_micros();

    match &result {
        Ok(sim) => debug!(
            left_rows = left.len(),
            right_rows = right.len(),
            permutations = sim.permutations,
            matches = sim.matches,
            score = sim.score,
            elapsed_micros,
            "compare_success"
        ),
        Err(err) => warn!(error = %err, elapsed_micros, "compare_failure"),
    }
    result
}

fn compare_inner(
    left: &DocumentFingerprint,
    right: &DocumentFingerprint,
    cfg: &MatchConfig,
) -> Result<Similarity, MatchError> {
    if cfg.permutations == 0 {
        return Err(MatchError::InvalidConfig(
            "permutations must be greater than zero".into(),
        ));
    }
    if left.is_empty() {
        return Err(MatchError::EmptyInput { side: Side::Left });
    }
    if right.is_empty() {
        return Err(MatchError::EmptyInput { side: Side::Right });
    }
    if left.seed() != right.seed() {
        return Err(MatchError::SeedMismatch {
            left: left.seed(),
            right: right.seed(),
        });
    }
    let left_mins = ColumnMinima::compute_side(left, cfg, Side::Left)?;
    let right_mins = ColumnMinima::compute_side(right, cfg, Side::Right)?;
    left_mins.matching(&right_mins)
}

/// Estimate similarity for fingerprint sequences whose seed is already known
/// to be shared.
///
/// This skips the seed bookkeeping carried by [`DocumentFingerprint`]; the
/// caller vouches that both slices were hashed under one seed.
pub fn compare_hashes(
    left: &[u64],
    right: &[u64],
    cfg: &MatchConfig,
) -> Result<Similarity, MatchError> {
    if cfg.permutations == 0 {
        return Err(MatchError::InvalidConfig(
            "permutations must be greater than zero".into(),
        ));
    }
    let left_mins = column_minima(left, cfg.permutations, cfg.use_parallel)
        .ok_or(MatchError::EmptyInput { side: Side::Left })?;
    let right_mins = column_minima(right, cfg.permutations, cfg.use_parallel)
        .ok_or(MatchError::EmptyInput { side: Side::Right })?;
    let matches = left_mins
        .iter()
        .zip(&right_mins)
        .filter(|(a, b)| a == b)
        .count();
    Ok(Similarity::from_counts(matches, cfg.permutations))
}

/// One document compared against many.
///
/// The subject's column minima are computed once on construction; every
/// [`compare`](Self::compare) call recomputes only the other side.
#[derive(Debug, Clone)]
pub struct BatchComparer {
    subject: ColumnMinima,
    cfg: MatchConfig,
}

impl BatchComparer {
    pub fn new(subject: &DocumentFingerprint, cfg: &MatchConfig) -> Result<Self, MatchError> {
        cfg.validate_estimator()?;
        Ok(Self {
            subject: ColumnMinima::compute_side(subject, cfg, Side::Left)?,
            cfg: cfg.clone(),
        })
    }

    /// Seed other documents must be fingerprinted under.
    pub fn seed(&self) -> u64 {
        self.subject.seed()
    }

    pub fn compare(&self, other: &DocumentFingerprint) -> Result<Similarity, MatchError> {
        if other.seed() != self.subject.seed() {
            return Err(MatchError::SeedMismatch {
                left: self.subject.seed(),
                right: other.seed(),
            });
        }
        let other_mins = ColumnMinima::compute_side(other, &self.cfg, Side::Right)?;
        self.subject.matching(&other_mins)
    }
}

/// Compare `subject` against every document in `others`.
///
/// A failing pairing is reported in its [`BatchHit`] and does not stop the
/// batch; only an invalid config or an empty subject fails the whole call.
pub fn compare_batch<'a, K, I>(
    subject: &DocumentFingerprint,
    others: I,
    cfg: &MatchConfig,
) -> Result<Vec<BatchHit<K>>, MatchError>
where
    I: IntoIterator<Item = (K, &'a DocumentFingerprint)>,
{
    let start = Instant::now();
    let comparer = BatchComparer::new(subject, cfg)?;
    let hits: Vec<BatchHit<K>> = others
        .into_iter()
        .map(|(key, other)| BatchHit {
            key,
            outcome: comparer.compare(other),
        })
        .collect();

    info!(
        pairs = hits.len(),
        failed = hits.iter().filter(|h| h.outcome.is_err()).count(),
        permutations = cfg.permutations,
        elapsed_micros = start.elapsed().as_micros(),
        "compare_batch_complete"
    );
    Ok(hits)
}

/// Repeat a comparison `cfg.runs` times, each under a fresh seed, and average.
///
/// For every run a seed is drawn from `seeds` and handed to
/// `fingerprint_pair`, which must fingerprint both documents under exactly
/// that seed. Runs are sequential and share no state beyond the seed source.
pub fn average_runs<S, F, E>(
    cfg: &MatchConfig,
    seeds: &mut S,
    mut fingerprint_pair: F,
) -> Result<AveragedSimilarity, E>
where
    S: SeedSource + ?Sized,
    F: FnMut(u64) -> Result<(DocumentFingerprint, DocumentFingerprint), E>,
    E: From<MatchError>,
{
    cfg.validate()?;
    let start = Instant::now();
    let mut runs = Vec::with_capacity(cfg.runs);

    for run in 1..=cfg.runs {
        let seed = seeds.next_seed();
        let (left, right) = fingerprint_pair(seed)?;
        for fp in [&left, &right] {
            if fp.seed() != seed {
                return Err(MatchError::SeedMismatch {
                    left: seed,
                    right: fp.seed(),
                }
                .into());
            }
        }
        let similarity = compare_with_config(&left, &right, cfg)?;
        debug!(run, runs = cfg.runs, score = similarity.score, "averaged_run");
        runs.push(RunReport {
            run,
            seed,
            similarity,
        });
    }

    let mean = runs.iter().map(|r| r.similarity.score).sum::<f64>() / runs.len() as f64;
    info!(
        runs = runs.len(),
        permutations = cfg.permutations,
        mean,
        elapsed_micros = start.elapsed().as_micros(),
        "average_runs_complete"
    );
    Ok(AveragedSimilarity { runs, mean })
}
