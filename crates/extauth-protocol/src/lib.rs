//! Wire framing and request types for the XMPP external authentication
//! (extauth) protocol.
//!
//! An XMPP server spawns the authentication process once and talks to it
//! over the process's stdin/stdout for the lifetime of the connection.
//!
//! # Protocol Overview
//!
//! Requests are length-prefixed text:
//! - 2 bytes: payload length (u16, big-endian)
//! - N bytes: `command:username:servername:password`
//!
//! Responses are always 4 bytes: `0x0002` followed by `0x0001` (success) or
//! `0x0000` (failure).
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//! use extauth_protocol::{FrameReader, Request, encode_frame};
//!
//! let bytes = encode_frame(b"auth:bob:ex.com:pw").unwrap();
//! let mut reader = FrameReader::new(Cursor::new(bytes));
//! let request = Request::from_payload(&reader.read_frame().unwrap()).unwrap();
//! assert_eq!(request.username, "bob");
//! ```

mod error;
mod framing;
mod types;

pub use error::{ProtocolError, ProtocolResult};
pub use framing::{FrameReader, FrameWriter, decode_frame, encode_frame};
pub use types::{Command, Request, Response, UnknownCommand};

/// Maximum payload size a 2-byte length prefix can describe.
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Value of the length prefix on every response frame.
pub const RESPONSE_LENGTH: u16 = 2;

/// Separator between request fields.
pub const FIELD_DELIMITER: char = ':';
