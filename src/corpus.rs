//! Document corpus backed by a listing file.
//!
//! The listing names one document per line; names resolve against a root
//! directory. Only listed documents can be opened.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Where the listing lives and which directory the listed names resolve in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CorpusConfig {
    /// Listing file, one document name per line.
    pub listing: PathBuf,
    /// Directory holding the listed documents.
    pub root: PathBuf,
}

impl CorpusConfig {
    pub fn with_listing(mut self, listing: impl Into<PathBuf>) -> Self {
        self.listing = listing.into();
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            listing: PathBuf::from("init.txt"),
            root: PathBuf::from("db"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorpusError {
    #[error("failed to read listing `{}`: {reason}", .path.display())]
    Listing { path: PathBuf, reason: String },
    #[error("`{name}` is not listed in the corpus")]
    UnknownDocument { name: String },
    #[error("couldn't open `{}`: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },
}

/// Listed documents and the directory they live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    root: PathBuf,
    names: Vec<String>,
}

impl Corpus {
    /// Read the listing named by `cfg`.
    pub fn load(cfg: &CorpusConfig) -> Result<Self, CorpusError> {
        let listing = fs::read_to_string(&cfg.listing).map_err(|err| CorpusError::Listing {
            path: cfg.listing.clone(),
            reason: err.to_string(),
        })?;
        let corpus = Self::from_listing(&listing, &cfg.root);
        debug!(
            listing = %cfg.listing.display(),
            documents = corpus.len(),
            "corpus_loaded"
        );
        Ok(corpus)
    }

    /// Parse listing text. Surrounding whitespace is trimmed and blank lines
    /// are skipped; order is kept and repeated names are listed once.
    pub fn from_listing(listing: &str, root: impl Into<PathBuf>) -> Self {
        let mut names: Vec<String> = Vec::new();
        for line in listing.lines() {
            let name = line.trim();
            if name.is_empty() || names.iter().any(|n| n == name) {
                continue;
            }
            names.push(name.to_string());
        }
        Self {
            root: root.into(),
            names,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Path of a listed document.
    pub fn path(&self, name: &str) -> Result<PathBuf, CorpusError> {
        if !self.contains(name) {
            return Err(CorpusError::UnknownDocument {
                name: name.to_string(),
            });
        }
        Ok(self.root.join(name))
    }

    /// Open a listed document for reading.
    pub fn open(&self, name: &str) -> Result<File, CorpusError> {
        let path = self.path(name)?;
        File::open(&path).map_err(|err| CorpusError::Open {
            reason: err.to_string(),
            path,
        })
    }
}
