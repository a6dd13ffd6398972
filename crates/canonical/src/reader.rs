//! Lazy, restartable word tokenizer over a byte stream.
//!
//! [`WordReader`] pulls one word at a time from any `Read + Seek` source
//! without loading the document into memory. Each call skips the delimiter
//! run in front of the next word, so a document is consumed in a single
//! forward pass. [`WordReader::rewind`] seeks back to the stream start, which
//! lets a caller re-tokenize the same document once per comparison run
//! without reopening it.

use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

use tracing::debug;

use crate::config::TokenizeConfig;
use crate::error::CanonicalError;
use crate::token::{is_word_byte, Token};

/// Streaming tokenizer yielding [`Token`]s from a byte source.
#[derive(Debug)]
pub struct WordReader<R> {
    inner: BufReader<R>,
    cfg: TokenizeConfig,
    offset: usize,
    word: Vec<u8>,
    word_start: usize,
    failed: bool,
}

impl<R: Read + Seek> WordReader<R> {
    /// Wrap `inner` with the default [`TokenizeConfig`].
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            cfg: TokenizeConfig::default(),
            offset: 0,
            word: Vec::new(),
            word_start: 0,
            failed: false,
        }
    }

    /// Wrap `inner` with an explicit configuration.
    pub fn with_config(inner: R, cfg: TokenizeConfig) -> Result<Self, CanonicalError> {
        cfg.validate()?;
        let mut reader = Self::new(inner);
        reader.cfg = cfg;
        Ok(reader)
    }

    pub fn config(&self) -> &TokenizeConfig {
        &self.cfg
    }

    /// Byte offset of the next unread byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Return the next word, or `None` once the stream holds no more words.
    ///
    /// A word still open when the stream ends is emitted as the last token.
    pub fn next_token(&mut self) -> Result<Option<Token>, CanonicalError> {
        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            if buf.is_empty() {
                return Ok(self.take_word());
            }

            let mut consumed = 0;
            let mut boundary = false;
            let mut overflow = false;
            for &byte in buf {
                if is_word_byte(byte, self.word.len())
                    && self.word.len() >= self.cfg.max_token_bytes
                {
                    // The offending byte stays unread.
                    overflow = true;
                    break;
                }
                consumed += 1;
                let pos = self.offset;
                self.offset += 1;
                if is_word_byte(byte, self.word.len()) {
                    if self.word.is_empty() {
                        self.word_start = pos;
                    }
                    let byte = if self.cfg.lowercase {
                        byte.to_ascii_lowercase()
                    } else {
                        byte
                    };
                    self.word.push(byte);
                } else if !self.word.is_empty() {
                    boundary = true;
                    break;
                }
            }
            self.inner.consume(consumed);

            if overflow {
                return Err(CanonicalError::TokenTooLong {
                    limit: self.cfg.max_token_bytes,
                });
            }
            if boundary {
                return Ok(self.take_word());
            }
        }
    }

    /// Seek back to the start of the stream.
    ///
    /// After a rewind the reader yields exactly the token sequence it yielded
    /// the first time, provided the underlying bytes did not change.
    pub fn rewind(&mut self) -> Result<(), CanonicalError> {
        self.inner.seek(SeekFrom::Start(0))?;
        debug!(read_bytes = self.offset, "word_reader_rewind");
        self.offset = 0;
        self.word.clear();
        self.word_start = 0;
        self.failed = false;
        Ok(())
    }

    /// Consume the reader and return the underlying source.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    fn take_word(&mut self) -> Option<Token> {
        if self.word.is_empty() {
            return None;
        }
        // Word bytes are ASCII, so each byte maps to one char.
        let text: String = self.word.iter().map(|&b| char::from(b)).collect();
        let start = self.word_start;
        self.word.clear();
        Some(Token {
            end: start + text.len(),
            text,
            start,
        })
    }
}

impl<R: Read + Seek> Iterator for WordReader<R> {
    type Item = Result<Token, CanonicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
