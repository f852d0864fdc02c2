//! Server error types.

use thiserror::Error;

/// Errors that stop the server from running.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind to {addr}")]
    Bind {
        /// The address that could not be bound.
        addr: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}
