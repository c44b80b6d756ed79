// core/src/errors/fetch_error.rs
use thiserror::Error;

/// Failure talking to the script-runner backend.
///
/// A lookup that can fall back on a cached value never surfaces one of these;
/// only a cold miss with a failed remote call propagates.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("backend unavailable")]
    Unavailable,

    #[error("request timeout")]
    Timeout,

    #[error("unauthorized (check api key)")]
    Unauthorized,

    #[error("not found: {resource}")]
    NotFound { resource: String },

    #[error("unexpected status: {status}")]
    HttpStatus { status: u16, body_snippet: String },

    #[error("transport error")]
    Transport(#[source] anyhow::Error),

    #[error("decode/serde error")]
    Decode(#[source] anyhow::Error),
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Unavailable | FetchError::Timeout)
    }
}
