//! Workspace umbrella crate for docsim, shingle-based document similarity.
//!
//! This crate stitches the tokenizer, fingerprinting and matcher stages
//! together so callers can go from document byte streams to a similarity
//! score with a single call, and ships the `docsim` command-line tool.

pub mod config;
pub mod corpus;
pub mod report;

pub use canonical::{tokenize, CanonicalError, Token, TokenizeConfig, WordReader};
pub use matcher::{
    average_runs, compare, compare_batch, compare_with_config, AveragedSimilarity, BatchComparer,
    BatchHit, FixedSeeds, MatchConfig, MatchError, RandomSeeds, RunReport, SeedSource, Side,
    Similarity,
};
pub use perceptual::{
    fingerprint_document, hash64, DocumentFingerprint, Fingerprinter, PerceptualConfig,
    PerceptualError,
};

pub use crate::config::{ConfigLoadError, DocsimConfig, LoggingConfig};
pub use crate::corpus::{Corpus, CorpusConfig, CorpusError};

use std::fs::File;
use std::io::{Read, Seek};
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn, Level};

/// Errors that can occur while running documents through the pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("tokenization failure: {0}")]
    Canonical(#[from] CanonicalError),
    #[error("fingerprinting failure: {0}")]
    Perceptual(#[from] PerceptualError),
    #[error("comparison failure: {0}")]
    Match(#[from] MatchError),
    #[error("corpus failure: {0}")]
    Corpus(#[from] CorpusError),
    #[error("`{name}` was given for both sides; pick two different documents")]
    SameDocument { name: String },
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_fingerprint(&self, latency: Duration, result: Result<(), PipelineError>);
    fn record_compare(&self, latency: Duration, result: Result<(), MatchError>);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_fingerprint(self, result: Result<(), PipelineError>) {
        self.recorder
            .record_fingerprint(self.start.elapsed(), result);
    }

    fn record_compare(self, result: Result<(), MatchError>) {
        self.recorder.record_compare(self.start.elapsed(), result);
    }
}

/// Fingerprint the remaining words of `reader`.
///
/// Reading starts at the reader's current position; call
/// [`WordReader::rewind`] first to fingerprint a document again.
pub fn fingerprint_reader<R: Read + Seek>(
    reader: &mut WordReader<R>,
    cfg: &PerceptualConfig,
) -> Result<DocumentFingerprint, PipelineError> {
    let span = MetricsSpan::start();
    let result = fingerprint_reader_inner(reader, cfg);
    if let Some(span) = span {
        span.record_fingerprint(result.as_ref().map(|_| ()).map_err(Clone::clone));
    }
    result
}

fn fingerprint_reader_inner<R: Read + Seek>(
    reader: &mut WordReader<R>,
    cfg: &PerceptualConfig,
) -> Result<DocumentFingerprint, PipelineError> {
    cfg.validate()?;
    let mut builder = Fingerprinter::new(cfg.shingle_length, cfg.seed)?;
    while let Some(token) = reader.next_token()? {
        builder.push(&token.text);
    }
    let token_count = builder.token_count();
    let fp = builder.finish()?;
    debug!(
        tokens = token_count,
        shingles = fp.len(),
        bytes_read = reader.offset(),
        "reader_fingerprinted"
    );
    Ok(fp)
}

/// Fingerprint in-memory text with the default tokenizer rules.
pub fn fingerprint_text(
    text: &str,
    cfg: &PerceptualConfig,
) -> Result<DocumentFingerprint, PipelineError> {
    let tokens = tokenize(text);
    Ok(perceptual::fingerprint_tokens(&tokens, cfg)?)
}

/// Compare two fingerprints, reporting the outcome to the metrics observer.
fn compare_observed(
    left: &DocumentFingerprint,
    right: &DocumentFingerprint,
    cfg: &MatchConfig,
) -> Result<Similarity, MatchError> {
    let span = MetricsSpan::start();
    let result = compare_with_config(left, right, cfg);
    if let Some(span) = span {
        span.record_compare(result.as_ref().map(|_| ()).map_err(Clone::clone));
    }
    result
}

/// Fingerprint both readers under `perceptual.seed` and compare them.
pub fn compare_readers<A, B>(
    left: &mut WordReader<A>,
    right: &mut WordReader<B>,
    perceptual: &PerceptualConfig,
    matcher: &MatchConfig,
) -> Result<Similarity, PipelineError>
where
    A: Read + Seek,
    B: Read + Seek,
{
    matcher.validate_estimator()?;
    let left_fp = fingerprint_reader(left, perceptual)?;
    let right_fp = fingerprint_reader(right, perceptual)?;
    Ok(compare_observed(&left_fp, &right_fp, matcher)?)
}

/// Repeat [`compare_readers`] `matcher.runs` times, one fresh seed per run.
///
/// Both readers are rewound before every run so each run tokenizes the full
/// documents again.
pub fn average_readers<A, B, S>(
    left: &mut WordReader<A>,
    right: &mut WordReader<B>,
    perceptual: &PerceptualConfig,
    matcher: &MatchConfig,
    seeds: &mut S,
) -> Result<AveragedSimilarity, PipelineError>
where
    A: Read + Seek,
    B: Read + Seek,
    S: SeedSource + ?Sized,
{
    average_runs(matcher, seeds, |seed| {
        left.rewind()?;
        right.rewind()?;
        let cfg = perceptual.clone().with_seed(seed);
        Ok((
            fingerprint_reader(left, &cfg)?,
            fingerprint_reader(right, &cfg)?,
        ))
    })
}

/// Open a listed document as a word stream.
pub fn open_reader(
    corpus: &Corpus,
    name: &str,
    cfg: &TokenizeConfig,
) -> Result<WordReader<File>, PipelineError> {
    let file = corpus.open(name)?;
    Ok(WordReader::with_config(file, cfg.clone())?)
}

fn ensure_distinct(left: &str, right: &str) -> Result<(), PipelineError> {
    if left == right {
        return Err(PipelineError::SameDocument {
            name: left.to_string(),
        });
    }
    Ok(())
}

/// Compare two listed documents once under `config.perceptual.seed`.
pub fn compare_documents(
    corpus: &Corpus,
    left: &str,
    right: &str,
    config: &DocsimConfig,
) -> Result<Similarity, PipelineError> {
    ensure_distinct(left, right)?;
    let span = tracing::span!(Level::INFO, "docsim.compare", left = %left, right = %right);
    let _guard = span.enter();

    let mut left_reader = open_reader(corpus, left, &config.tokenizer)?;
    let mut right_reader = open_reader(corpus, right, &config.tokenizer)?;
    let sim = compare_readers(
        &mut left_reader,
        &mut right_reader,
        &config.perceptual,
        &config.matcher,
    )?;
    info!(
        matches = sim.matches,
        permutations = sim.permutations,
        score = sim.score,
        "documents_compared"
    );
    Ok(sim)
}

/// Averaged comparison of two listed documents.
pub fn average_documents<S: SeedSource + ?Sized>(
    corpus: &Corpus,
    left: &str,
    right: &str,
    config: &DocsimConfig,
    seeds: &mut S,
) -> Result<AveragedSimilarity, PipelineError> {
    ensure_distinct(left, right)?;
    let span = tracing::span!(Level::INFO, "docsim.average", left = %left, right = %right);
    let _guard = span.enter();

    let mut left_reader = open_reader(corpus, left, &config.tokenizer)?;
    let mut right_reader = open_reader(corpus, right, &config.tokenizer)?;
    average_readers(
        &mut left_reader,
        &mut right_reader,
        &config.perceptual,
        &config.matcher,
        seeds,
    )
}

/// Result of comparing the scan subject with one other listed document.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanHit {
    pub name: String,
    pub outcome: Result<Similarity, PipelineError>,
}

/// Compare `subject` against every other listed document.
///
/// The subject is fingerprinted once and its column minima reused for every
/// pairing. A document that cannot be opened or fingerprinted is reported in
/// its [`ScanHit`] and the scan continues. `progress` is called with
/// `(done, total)` before each pairing.
pub fn scan_corpus<P>(
    corpus: &Corpus,
    subject: &str,
    config: &DocsimConfig,
    mut progress: P,
) -> Result<Vec<ScanHit>, PipelineError>
where
    P: FnMut(usize, usize),
{
    let start = Instant::now();
    let span = tracing::span!(Level::INFO, "docsim.scan", subject = %subject);
    let _guard = span.enter();

    let mut subject_reader = open_reader(corpus, subject, &config.tokenizer)?;
    let subject_fp = fingerprint_reader(&mut subject_reader, &config.perceptual)?;
    let comparer = BatchComparer::new(&subject_fp, &config.matcher)?;

    let others: Vec<&String> = corpus.names().iter().filter(|n| *n != subject).collect();
    let total = others.len();
    let mut hits = Vec::with_capacity(total);
    for (done, name) in others.into_iter().enumerate() {
        progress(done + 1, total);
        let outcome = open_reader(corpus, name, &config.tokenizer)
            .and_then(|mut reader| fingerprint_reader(&mut reader, &config.perceptual))
            .and_then(|fp| {
                let span = MetricsSpan::start();
                let result = comparer.compare(&fp);
                if let Some(span) = span {
                    span.record_compare(result.as_ref().map(|_| ()).map_err(Clone::clone));
                }
                result.map_err(PipelineError::from)
            });
        if let Err(err) = &outcome {
            warn!(document = %name, error = %err, "scan_pair_failure");
        }
        hits.push(ScanHit {
            name: name.clone(),
            outcome,
        });
    }

    info!(
        documents = hits.len(),
        failed = hits.iter().filter(|h| h.outcome.is_err()).count(),
        elapsed_micros = start.elapsed().as_micros(),
        "scan_complete"
    );
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::{Arc, RwLock};
    use std::time::Duration;

    const SONNET: &str = "Shall I compare thee to a summer's day? Thou art more lovely \
        and more temperate: Rough winds do shake the darling buds of May";

    fn reader(text: &str) -> WordReader<Cursor<Vec<u8>>> {
        WordReader::new(Cursor::new(text.as_bytes().to_vec()))
    }

    #[test]
    fn reader_and_text_fingerprints_agree() {
        let cfg = PerceptualConfig::default().with_seed(11);
        let from_reader = fingerprint_reader(&mut reader(SONNET), &cfg).unwrap();
        let from_text = fingerprint_text(SONNET, &cfg).unwrap();
        assert_eq!(from_reader, from_text);
    }

    #[test]
    fn reader_fingerprint_counts_final_word() {
        let cfg = PerceptualConfig::default();
        let fp = fingerprint_reader(&mut reader("the quick brown fox"), &cfg).unwrap();
        assert_eq!(fp.meta.token_count, 4);
        assert_eq!(fp.len(), 3);
    }

    #[test]
    fn compare_readers_self_similarity() {
        let sim = compare_readers(
            &mut reader(SONNET),
            &mut reader(SONNET),
            &PerceptualConfig::default(),
            &MatchConfig::default().with_permutations(256),
        )
        .unwrap();
        assert_eq!(sim.score, 1.0);
        assert_eq!(sim.matches, 256);
    }

    #[test]
    fn compare_readers_rejects_one_word_document() {
        let err = compare_readers(
            &mut reader(SONNET),
            &mut reader("lonely"),
            &PerceptualConfig::default(),
            &MatchConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Perceptual(PerceptualError::EmptyInput { tokens: 1, .. })
        ));
    }

    #[test]
    fn average_readers_rewinds_between_runs() {
        let mut seeds = FixedSeeds::new([1u64, 2, 3]);
        let avg = average_readers(
            &mut reader(SONNET),
            &mut reader(SONNET),
            &PerceptualConfig::default(),
            &MatchConfig::default().with_permutations(64).with_runs(3),
            &mut seeds,
        )
        .unwrap();
        assert_eq!(avg.runs.len(), 3);
        assert_eq!(avg.mean, 1.0);
    }

    #[test]
    fn same_document_is_rejected() {
        let corpus = Corpus::from_listing("a.txt\n", "db");
        let err = compare_documents(&corpus, "a.txt", "a.txt", &DocsimConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::SameDocument {
                name: "a.txt".into()
            }
        );
    }

    #[derive(Default)]
    struct CountingMetrics {
        events: Arc<RwLock<Vec<&'static str>>>,
    }

    impl CountingMetrics {
        fn snapshot(&self) -> Vec<&'static str> {
            self.events.read().unwrap().clone()
        }
    }

    impl PipelineMetrics for CountingMetrics {
        fn record_fingerprint(&self, _latency: Duration, result: Result<(), PipelineError>) {
            let label = if result.is_ok() {
                "fingerprint_ok"
            } else {
                "fingerprint_err"
            };
            self.events.write().unwrap().push(label);
        }

        fn record_compare(&self, _latency: Duration, result: Result<(), MatchError>) {
            let label = if result.is_ok() {
                "compare_ok"
            } else {
                "compare_err"
            };
            self.events.write().unwrap().push(label);
        }
    }

    #[test]
    fn metrics_recorder_tracks_pipeline_outcome() {
        let metrics = Arc::new(CountingMetrics::default());
        set_pipeline_metrics(Some(metrics.clone()));

        let ok = compare_readers(
            &mut reader(SONNET),
            &mut reader("rough winds do shake"),
            &PerceptualConfig::default(),
            &MatchConfig::default().with_permutations(32),
        );
        let failed = compare_readers(
            &mut reader(SONNET),
            &mut reader("alone"),
            &PerceptualConfig::default(),
            &MatchConfig::default().with_permutations(32),
        );

        set_pipeline_metrics(None);

        assert!(ok.is_ok());
        assert!(failed.is_err());
        let events = metrics.snapshot();
        assert!(events.contains(&"fingerprint_ok"));
        assert!(events.contains(&"compare_ok"));
        assert!(events.contains(&"fingerprint_err"));
    }
}
