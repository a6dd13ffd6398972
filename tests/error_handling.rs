use std::io::{self, Cursor, Read, Seek, SeekFrom};

use docsim::{
    CanonicalError, ConfigLoadError, Corpus, DocsimConfig, MatchConfig, MatchError,
    PerceptualConfig, PerceptualError, PipelineError, Side, TokenizeConfig, WordReader,
    compare, compare_documents, compare_readers, fingerprint_document, fingerprint_text,
};

fn reader(text: &str) -> WordReader<Cursor<Vec<u8>>> {
    WordReader::new(Cursor::new(text.as_bytes().to_vec()))
}

#[test]
fn one_word_document_is_empty_input() {
    let result = fingerprint_text("solitary", &PerceptualConfig::default());
    assert_eq!(
        result,
        Err(PipelineError::Perceptual(PerceptualError::EmptyInput {
            tokens: 1,
            shingle_length: 2,
        }))
    );
}

#[test]
fn document_without_words_is_empty_input() {
    let result = fingerprint_text("... --- !!! \u{00bf}?", &PerceptualConfig::default());
    assert!(matches!(
        result,
        Err(PipelineError::Perceptual(PerceptualError::EmptyInput { tokens: 0, .. }))
    ));
}

#[test]
fn zero_shingle_length_is_invalid_configuration() {
    let cfg = PerceptualConfig::default().with_shingle_length(0);
    assert!(matches!(
        fingerprint_text("plenty of words here", &cfg),
        Err(PipelineError::Perceptual(
            PerceptualError::InvalidShingleLength { shingle_length: 0 }
        ))
    ));
}

#[test]
fn zero_permutations_is_invalid_configuration() {
    let fp = fingerprint_document(["a", "b", "c"], 2, 1).unwrap();
    assert!(matches!(compare(&fp, &fp, 0), Err(MatchError::InvalidConfig(_))));

    let err = compare_readers(
        &mut reader("a b c"),
        &mut reader("a b c"),
        &PerceptualConfig::default(),
        &MatchConfig::default().with_permutations(0),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::Match(MatchError::InvalidConfig(_))));
}

#[test]
fn empty_side_is_named_in_the_error() {
    let err = compare_readers(
        &mut reader("one two three"),
        &mut reader("four"),
        &PerceptualConfig::default(),
        &MatchConfig::default(),
    )
    .unwrap_err();
    // The fingerprint stage rejects the short document before comparison.
    assert!(matches!(
        err,
        PipelineError::Perceptual(PerceptualError::EmptyInput { .. })
    ));

    let good = fingerprint_document(["x", "y", "z"], 2, 4).unwrap();
    let mut empty = good.clone();
    empty.hashes.clear();
    assert_eq!(
        compare(&good, &empty, 10),
        Err(MatchError::EmptyInput { side: Side::Right })
    );
}

#[test]
fn fingerprints_under_different_seeds_are_rejected() {
    let a = fingerprint_document(["same", "words", "here"], 2, 1).unwrap();
    let b = fingerprint_document(["same", "words", "here"], 2, 2).unwrap();
    assert_eq!(
        compare(&a, &b, 100),
        Err(MatchError::SeedMismatch { left: 1, right: 2 })
    );
}

#[test]
fn oversized_token_is_reported() {
    let cfg = TokenizeConfig::default().with_max_token_bytes(8);
    let mut long = WordReader::with_config(Cursor::new(b"short averyveryverylongword".to_vec()), cfg)
        .unwrap();
    let err = compare_readers(
        &mut reader("short words here"),
        &mut long,
        &PerceptualConfig::default(),
        &MatchConfig::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        PipelineError::Canonical(CanonicalError::TokenTooLong { limit: 8 })
    );
}

/// A stream that fails after handing out its first bytes.
struct FlakyStream {
    served: bool,
}

impl Read for FlakyStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.served {
            return Err(io::Error::other("disk went away"));
        }
        self.served = true;
        let data = b"alpha beta ";
        buf[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }
}

impl Seek for FlakyStream {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        self.served = false;
        Ok(0)
    }
}

#[test]
fn stream_failure_surfaces_as_canonical_io_error() {
    let mut flaky = WordReader::new(FlakyStream { served: false });
    let err = compare_readers(
        &mut flaky,
        &mut reader("alpha beta gamma"),
        &PerceptualConfig::default(),
        &MatchConfig::default(),
    )
    .unwrap_err();
    match err {
        PipelineError::Canonical(CanonicalError::Io(msg)) => assert!(msg.contains("disk went away")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unlisted_document_is_rejected() {
    let corpus = Corpus::from_listing("a.txt\nb.txt\n", "db");
    let err = compare_documents(&corpus, "a.txt", "z.txt", &DocsimConfig::default())
        .unwrap_err();
    assert!(matches!(err, PipelineError::Corpus(_)));
    assert!(err.to_string().contains("z.txt"));
}

#[test]
fn identical_names_are_rejected() {
    let corpus = Corpus::from_listing("a.txt\n", "db");
    let err = compare_documents(&corpus, "a.txt", "a.txt", &DocsimConfig::default())
        .unwrap_err();
    assert!(matches!(err, PipelineError::SameDocument { .. }));
}

#[test]
fn invalid_yaml_values_are_rejected() {
    let err = DocsimConfig::from_yaml("version: \"1.0\"\nmatcher:\n  permutations: 0\n")
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Validation(_)));

    let err = DocsimConfig::from_yaml("version: \"1.0\"\nlogging:\n  level: \"\"\n").unwrap_err();
    assert!(err.to_string().contains("logging.level"));
}
