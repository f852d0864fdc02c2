//! Web layer error types.

use thiserror::Error;

/// Errors surfaced by handlers and the response helpers.
#[derive(Error, Debug)]
pub enum WebError {
    /// Response payload could not be serialized.
    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A response could not be constructed.
    #[error("failed to build response: {0}")]
    Http(#[from] http::Error),

    /// Handler-specific failure with a message.
    #[error("handler error: {0}")]
    Handler(String),
}

impl WebError {
    /// Creates a handler error from any displayable value.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }
}
