//! Service error types.

use std::io;
use thiserror::Error;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors that can end a service run.
///
/// Per-cycle failures never show up here; the run loop answers them with a
/// failure response and carries on.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The input or output stream could not be opened.
    #[error("failed to bind {stream}: {source}")]
    StreamBind {
        stream: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ServiceError {
    /// Creates a stream bind error for the named stream.
    pub fn stream_bind(stream: &'static str, source: io::Error) -> Self {
        Self::StreamBind { stream, source }
    }
}
