//! Error types for backend operations

use thiserror::Error;

/// Errors surfaced by a [`CatalogBackend`](super::CatalogBackend)
///
/// Everything the coordinator shows the user funnels through here: transport
/// failures, non-2xx responses and bodies that fail to decode. A zero-match
/// result is not an error and never appears in this enum.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure (refused, DNS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Backend answered with a non-2xx status
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Body arrived but did not parse as the expected shape
    #[error("malformed response: {0}")]
    Decode(String),

    /// The configured base URL is unusable
    #[error("invalid backend url '{0}'")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_timeout() {
            Self::Network(format!("request timed out: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}
