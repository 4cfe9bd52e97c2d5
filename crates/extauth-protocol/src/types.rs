//! Request and response types.

use std::fmt;
use std::str::FromStr;

use crate::error::{ProtocolError, ProtocolResult};
use crate::{FIELD_DELIMITER, RESPONSE_LENGTH};

/// A request decoded from one frame payload.
///
/// The payload is `command:username:servername:password`; unused trailing
/// fields may be omitted by the peer and default to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Raw command name (`auth`, `isuser`, ...).
    pub command: String,
    /// Local part of the JID.
    pub username: String,
    /// Virtual host the user belongs to.
    pub servername: String,
    /// Password, for commands that carry one.
    pub password: String,
}

impl Request {
    /// Parses a frame payload into a request.
    ///
    /// Fields are assigned by position after splitting on `:`. Empty segments
    /// are preserved and segments past the fourth are dropped. Field contents
    /// are not validated or unescaped.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidRequest`] if the payload or its command
    /// field is empty.
    ///
    /// # Example
    ///
    /// ```rust
    /// use extauth_protocol::Request;
    ///
    /// let request = Request::parse("isuser:alice").unwrap();
    /// assert_eq!(request.command, "isuser");
    /// assert_eq!(request.username, "alice");
    /// assert_eq!(request.servername, "");
    /// ```
    pub fn parse(payload: &str) -> ProtocolResult<Self> {
        if payload.is_empty() {
            return Err(ProtocolError::InvalidRequest {
                reason: "empty payload",
            });
        }

        let mut fields = payload.split(FIELD_DELIMITER).map(str::to_owned);
        let request = Self {
            command: fields.next().unwrap_or_default(),
            username: fields.next().unwrap_or_default(),
            servername: fields.next().unwrap_or_default(),
            password: fields.next().unwrap_or_default(),
        };

        if request.command.is_empty() {
            return Err(ProtocolError::InvalidRequest {
                reason: "missing command",
            });
        }

        Ok(request)
    }

    /// Parses a raw frame payload.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD; valid input is
    /// passed through unchanged.
    pub fn from_payload(payload: &[u8]) -> ProtocolResult<Self> {
        Self::parse(&String::from_utf8_lossy(payload))
    }

    /// Returns the recognized command, if any.
    pub fn kind(&self) -> Option<Command> {
        self.command.parse().ok()
    }
}

/// The commands an XMPP server may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `auth`: check a password.
    Auth,
    /// `isuser`: check that an account exists.
    IsUser,
    /// `setpass`: change a password.
    SetPass,
    /// `tryregister`: create an account.
    TryRegister,
    /// `removeuser`: delete an account unconditionally.
    RemoveUser,
    /// `removeuser3`: delete an account after checking its password.
    RemoveUser3,
}

impl Command {
    /// All recognized commands.
    pub const ALL: [Command; 6] = [
        Command::Auth,
        Command::IsUser,
        Command::SetPass,
        Command::TryRegister,
        Command::RemoveUser,
        Command::RemoveUser3,
    ];

    /// Returns the wire name of this command.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::IsUser => "isuser",
            Self::SetPass => "setpass",
            Self::TryRegister => "tryregister",
            Self::RemoveUser => "removeuser",
            Self::RemoveUser3 => "removeuser3",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a command name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command: {}", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for Command {
    type Err = UnknownCommand;

    /// Matching is exact and case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// The boolean outcome of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response(bool);

impl Response {
    /// Positive outcome.
    pub const SUCCESS: Response = Response(true);
    /// Negative outcome.
    pub const FAILURE: Response = Response(false);

    /// Wraps a boolean result.
    pub fn new(success: bool) -> Self {
        Self(success)
    }

    /// Returns the wrapped result.
    pub fn is_success(&self) -> bool {
        self.0
    }

    /// Encodes the response frame: `[0x00 0x02]` then `[0x00 0x01]` or `[0x00 0x00]`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use extauth_protocol::Response;
    ///
    /// assert_eq!(Response::SUCCESS.encode(), [0x00, 0x02, 0x00, 0x01]);
    /// assert_eq!(Response::FAILURE.encode(), [0x00, 0x02, 0x00, 0x00]);
    /// ```
    pub fn encode(&self) -> [u8; 4] {
        let [l0, l1] = RESPONSE_LENGTH.to_be_bytes();
        let [v0, v1] = u16::from(self.0).to_be_bytes();
        [l0, l1, v0, v1]
    }
}

impl From<bool> for Response {
    fn from(success: bool) -> Self {
        Self(success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_request() {
        let request = Request::parse("auth:bob:ex.com:pw").unwrap();
        assert_eq!(
            request,
            Request {
                command: "auth".into(),
                username: "bob".into(),
                servername: "ex.com".into(),
                password: "pw".into(),
            }
        );
        assert_eq!(request.kind(), Some(Command::Auth));
    }

    #[test]
    fn parse_missing_fields_default_to_empty() {
        let request = Request::parse("isuser:x").unwrap();
        assert_eq!(request.command, "isuser");
        assert_eq!(request.username, "x");
        assert_eq!(request.servername, "");
        assert_eq!(request.password, "");
    }

    #[test]
    fn parse_preserves_empty_segments() {
        let request = Request::parse("setpass::ex.com:").unwrap();
        assert_eq!(request.username, "");
        assert_eq!(request.servername, "ex.com");
        assert_eq!(request.password, "");
    }

    #[test]
    fn parse_drops_segments_after_password() {
        let request = Request::parse("auth:bob:ex.com:p:w:extra").unwrap();
        assert_eq!(request.password, "p");
    }

    #[test]
    fn parse_rejects_empty_payload() {
        assert!(matches!(
            Request::parse(""),
            Err(ProtocolError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn parse_rejects_empty_command() {
        assert!(matches!(
            Request::parse(":bob:ex.com:pw"),
            Err(ProtocolError::InvalidRequest {
                reason: "missing command"
            })
        ));
        assert!(Request::parse(":").is_err());
    }

    #[test]
    fn parse_keeps_field_contents_verbatim() {
        let request = Request::parse("auth: bob %20:EX.com:p@ss word").unwrap();
        assert_eq!(request.username, " bob %20");
        assert_eq!(request.servername, "EX.com");
        assert_eq!(request.password, "p@ss word");
    }

    #[test]
    fn from_payload_replaces_invalid_utf8() {
        let request = Request::from_payload(b"auth:b\xffb:ex.com:pw").unwrap();
        assert_eq!(request.username, "b\u{fffd}b");
    }

    #[test]
    fn command_names_round_trip() {
        for command in Command::ALL {
            assert_eq!(command.as_str().parse::<Command>(), Ok(command));
        }
    }

    #[test]
    fn command_matching_is_exact() {
        assert!("AUTH".parse::<Command>().is_err());
        assert!("auth ".parse::<Command>().is_err());
        assert!("removeuser4".parse::<Command>().is_err());
        assert_eq!(
            "nope".parse::<Command>(),
            Err(UnknownCommand("nope".to_string()))
        );
    }

    #[test]
    fn response_encoding() {
        for success in [true, false] {
            let bytes = Response::from(success).encode();
            assert_eq!(bytes.len(), 4);
            assert_eq!(&bytes[..2], &[0x00, 0x02]);
            assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]), u16::from(success));
        }
    }
}
