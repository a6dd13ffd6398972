use serde::{Deserialize, Serialize};

/// A word with its byte offsets in the source document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// The token text content.
    pub text: String,
    /// Byte offset (inclusive) in the source document.
    pub start: usize,
    /// Byte offset (exclusive) in the source document.
    pub end: usize,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

/// Classifies one byte of a document.
///
/// ASCII letters and digits always belong to a word. An apostrophe belongs to
/// a word only when it is not the word's first byte, so `don't` and `dogs'`
/// stay whole while a leading quote is a delimiter. Everything else, including
/// every non-ASCII byte, separates words.
#[inline]
pub(crate) fn is_word_byte(byte: u8, word_len: usize) -> bool {
    byte.is_ascii_alphanumeric() || (byte == b'\'' && word_len > 0)
}

/// Tokenizes an in-memory document into words with byte offsets.
///
/// This applies the same byte classification as [`crate::WordReader`] and is
/// deterministic and locale-free.
pub fn tokenize(text: &str) -> Vec<Token> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, &byte) in bytes.iter().enumerate() {
        let word_len = start.map_or(0, |s| idx - s);
        if is_word_byte(byte, word_len) {
            if start.is_none() {
                start = Some(idx);
            }
        } else if let Some(token_start) = start.take() {
            tokens.push(Token {
                text: text[token_start..idx].to_string(),
                start: token_start,
                end: idx,
            });
        }
    }

    if let Some(token_start) = start {
        tokens.push(Token {
            text: text[token_start..].to_string(),
            start: token_start,
            end: text.len(),
        });
    }

    tokens
}
