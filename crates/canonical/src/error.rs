use thiserror::Error;

/// Errors that can occur while tokenizing a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("token exceeds {limit} bytes")]
    TokenTooLong { limit: usize },
    #[error("document stream failure: {0}")]
    Io(String),
}

impl From<std::io::Error> for CanonicalError {
    fn from(err: std::io::Error) -> Self {
        CanonicalError::Io(err.to_string())
    }
}
