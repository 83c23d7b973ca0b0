use thiserror::Error;

/// Failure classes surfaced by the library. Message payloads are shown to the
/// user verbatim, so upstream text must arrive here already human-readable.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("{0}")]
    Parse(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}

pub type TranslateResult<T> = Result<T, TranslateError>;

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        TranslateError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for TranslateError {
    fn from(err: serde_json::Error) -> Self {
        TranslateError::Internal(err.to_string())
    }
}
