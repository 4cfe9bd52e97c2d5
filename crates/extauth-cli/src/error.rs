//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the command-line client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Logging could not be set up.
    #[error("tracing error: {0}")]
    Tracing(#[from] extauth_core::TracingError),

    /// The service could not start.
    #[error("service error: {0}")]
    Service(#[from] extauth_server::ServiceError),
}
