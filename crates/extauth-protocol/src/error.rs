//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur during protocol operations.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The input stream closed or failed before a frame could be read.
    ///
    /// This is fatal: the peer is gone and no further frames will arrive.
    #[error("failed to read from input stream: {0}")]
    StreamRead(#[source] std::io::Error),

    /// The response could not be written to the output stream.
    #[error("failed to write to output stream: {0}")]
    StreamWrite(#[source] std::io::Error),

    /// A frame announced a zero-length payload.
    #[error("empty frame")]
    EmptyFrame,

    /// The input stream ended before the announced payload was complete.
    #[error("truncated frame: expected {expected} bytes, got {received}")]
    TruncatedFrame { expected: usize, received: usize },

    /// Payload exceeds what the 2-byte length prefix can describe.
    #[error("frame too large: {size} bytes (max: {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The payload has no command field.
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: &'static str },
}
