//! Length-prefixed framing for the extauth wire protocol.
//!
//! Every frame carries a 2-byte big-endian length prefix followed by the
//! payload:
//!
//! ```text
//! +----------------+------------------+
//! | length (2 BE)  |  payload         |
//! +----------------+------------------+
//! ```
//!
//! Requests carry `command:username:servername:password` as text. Responses
//! are always 4 bytes: length `2`, then `1` or `0` as a big-endian `u16`.

use std::io::{Read, Write};

use crate::MAX_PAYLOAD_SIZE;
use crate::error::{ProtocolError, ProtocolResult};
use crate::types::Response;

/// Size of the length prefix in bytes.
const PREFIX_LEN: usize = 2;

/// Encodes a payload with its length prefix.
///
/// # Example
///
/// ```rust
/// use extauth_protocol::encode_frame;
///
/// let bytes = encode_frame(b"isuser:x").unwrap();
/// assert_eq!(&bytes[..2], &[0x00, 0x08]);
/// ```
pub fn encode_frame(payload: &[u8]) -> ProtocolResult<Vec<u8>> {
    let len = u16::try_from(payload.len()).map_err(|_| ProtocolError::FrameTooLarge {
        size: payload.len(),
        max: MAX_PAYLOAD_SIZE,
    })?;

    let mut buffer = Vec::with_capacity(PREFIX_LEN + payload.len());
    buffer.extend_from_slice(&len.to_be_bytes());
    buffer.extend_from_slice(payload);
    Ok(buffer)
}

/// Decodes one complete frame held in memory and returns its payload.
///
/// Uses the same error taxonomy as [`FrameReader::read_frame`]: a missing or
/// partial prefix is a [`ProtocolError::StreamRead`].
pub fn decode_frame(data: &[u8]) -> ProtocolResult<&[u8]> {
    let Some((prefix, rest)) = data.split_first_chunk::<PREFIX_LEN>() else {
        return Err(ProtocolError::StreamRead(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "incomplete length prefix",
        )));
    };

    let len = usize::from(u16::from_be_bytes(*prefix));
    if len == 0 {
        return Err(ProtocolError::EmptyFrame);
    }

    if rest.len() < len {
        return Err(ProtocolError::TruncatedFrame {
            expected: len,
            received: rest.len(),
        });
    }

    Ok(&rest[..len])
}

/// Reads request frames from a byte stream.
///
/// Reads block until the requested bytes arrive; there is no timeout, the
/// service waits on the peer for as long as the stream stays open.
pub struct FrameReader<R> {
    reader: R,
}

impl<R: Read> FrameReader<R> {
    /// Creates a new FrameReader wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads a single frame and returns its payload.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::StreamRead`] if the prefix cannot be read in full
    ///   (including EOF) or the stream fails mid-payload.
    /// - [`ProtocolError::EmptyFrame`] if the prefix announces zero bytes.
    /// - [`ProtocolError::TruncatedFrame`] if the stream ends before the
    ///   announced payload is complete.
    pub fn read_frame(&mut self) -> ProtocolResult<Vec<u8>> {
        let mut len_buf = [0u8; PREFIX_LEN];
        self.reader
            .read_exact(&mut len_buf)
            .map_err(ProtocolError::StreamRead)?;

        let len = usize::from(u16::from_be_bytes(len_buf));
        if len == 0 {
            return Err(ProtocolError::EmptyFrame);
        }

        let mut payload = Vec::with_capacity(len);
        (&mut self.reader)
            .take(len as u64)
            .read_to_end(&mut payload)
            .map_err(ProtocolError::StreamRead)?;

        if payload.len() < len {
            return Err(ProtocolError::TruncatedFrame {
                expected: len,
                received: payload.len(),
            });
        }

        Ok(payload)
    }
}

/// Writes response frames to a byte stream.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: Write> FrameWriter<W> {
    /// Creates a new FrameWriter wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one response frame and flushes it.
    ///
    /// The peer blocks on the response, so it is flushed immediately.
    pub fn write_response(&mut self, response: Response) -> ProtocolResult<()> {
        self.writer
            .write_all(&response.encode())
            .and_then(|()| self.writer.flush())
            .map_err(ProtocolError::StreamWrite)
    }
}
