//! docsim word layer.
//!
//! This crate turns a document byte stream into the word sequence that the
//! shingling stage consumes. It is the only place that decides what a "word"
//! is, so every downstream fingerprint depends on these rules staying stable.
//!
//! ## What counts as a word
//!
//! - A maximal run of ASCII letters and digits
//! - An apostrophe is allowed inside a word, but never as its first byte
//! - Every other byte (whitespace, punctuation, non-ASCII) is a delimiter and
//!   never appears inside a token
//!
//! ## Two entry points
//!
//! - [`tokenize`] for in-memory text
//! - [`WordReader`] for lazy, restartable tokenization of any `Read + Seek`
//!   stream; [`WordReader::rewind`] replays the identical sequence
//!
//! No locale dependence, no clocks, no global state: the same bytes and
//! config always produce the same tokens.

mod config;
mod error;
mod reader;
mod token;

pub use crate::config::{TokenizeConfig, DEFAULT_MAX_TOKEN_BYTES};
pub use crate::error::CanonicalError;
pub use crate::reader::WordReader;
pub use crate::token::{tokenize, Token};
