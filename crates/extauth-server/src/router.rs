//! Request dispatch.
//!
//! Maps a parsed [`Request`] onto exactly one [`AuthBackend`] operation.
//! Backend errors, malformed payloads and unknown commands all end up as a
//! failure response; nothing here can stop the run loop.

use tracing::{debug, warn};

use extauth_protocol::{Command, Request, Response};

use crate::backend::AuthBackend;

/// How a request was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The backend answered.
    Answered(bool),
    /// The backend returned an error.
    BackendFailed,
    /// The command name is not one of the six known commands.
    Unrecognized,
    /// The payload was empty or had no command field.
    Invalid,
}

/// Result of dispatching one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// The recognized command, if any.
    pub command: Option<Command>,
    /// What happened.
    pub outcome: Outcome,
}

impl Dispatch {
    fn new(command: Option<Command>, outcome: Outcome) -> Self {
        Self { command, outcome }
    }

    /// Returns the response to send back to the peer.
    pub fn response(&self) -> Response {
        match self.outcome {
            Outcome::Answered(result) => Response::new(result),
            Outcome::BackendFailed | Outcome::Unrecognized | Outcome::Invalid => Response::FAILURE,
        }
    }
}

/// Routes requests to a backend.
pub struct CommandRouter<B> {
    backend: B,
}

impl<B: AuthBackend> CommandRouter<B> {
    /// Creates a router over the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Returns a reference to the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the router, returning the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Parses a raw payload and dispatches it.
    ///
    /// A payload that does not parse is answered like an unknown command,
    /// without touching the backend.
    pub fn dispatch_payload(&mut self, payload: &[u8]) -> Dispatch {
        match Request::from_payload(payload) {
            Ok(request) => self.dispatch(&request),
            Err(e) => {
                debug!(error = %e, "Rejecting malformed request");
                Dispatch::new(None, Outcome::Invalid)
            }
        }
    }

    /// Dispatches a parsed request to exactly one backend operation.
    #[tracing::instrument(skip_all, fields(command = %request.command, user = %request.username, server = %request.servername))]
    pub fn dispatch(&mut self, request: &Request) -> Dispatch {
        let Some(command) = request.kind() else {
            debug!("Unrecognized command");
            return Dispatch::new(None, Outcome::Unrecognized);
        };

        let Request {
            username: user,
            servername: server,
            password,
            ..
        } = request;

        let result = match command {
            Command::Auth => self.backend.authenticate(user, server, password),
            Command::IsUser => self.backend.user_exists(user, server),
            Command::SetPass => self.backend.set_password(user, server, password),
            Command::TryRegister => self.backend.register(user, server, password),
            Command::RemoveUser => self.backend.remove_user(user, server),
            Command::RemoveUser3 => self.backend.remove_user_with_password(user, server, password),
        };

        match result {
            Ok(answer) => {
                debug!(result = answer, "Backend answered");
                Dispatch::new(Some(command), Outcome::Answered(answer))
            }
            Err(e) => {
                warn!(error = %e, "Backend operation failed");
                Dispatch::new(Some(command), Outcome::BackendFailed)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::backend::{BackendError, BackendResult};

    /// Backend double that records every call and answers from a script.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingBackend {
        pub calls: Vec<(&'static str, Vec<String>)>,
        pub answer: bool,
        pub fail: bool,
    }

    impl RecordingBackend {
        pub fn answering(answer: bool) -> Self {
            Self {
                answer,
                ..Default::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn record(&mut self, op: &'static str, args: &[&str]) -> BackendResult<bool> {
            self.calls
                .push((op, args.iter().map(|a| a.to_string()).collect()));
            if self.fail {
                Err(BackendError::unavailable("store offline"))
            } else {
                Ok(self.answer)
            }
        }
    }

    impl AuthBackend for RecordingBackend {
        fn authenticate(&mut self, u: &str, s: &str, p: &str) -> BackendResult<bool> {
            self.record("authenticate", &[u, s, p])
        }

        fn user_exists(&mut self, u: &str, s: &str) -> BackendResult<bool> {
            self.record("user_exists", &[u, s])
        }

        fn set_password(&mut self, u: &str, s: &str, p: &str) -> BackendResult<bool> {
            self.record("set_password", &[u, s, p])
        }

        fn register(&mut self, u: &str, s: &str, p: &str) -> BackendResult<bool> {
            self.record("register", &[u, s, p])
        }

        fn remove_user(&mut self, u: &str, s: &str) -> BackendResult<bool> {
            self.record("remove_user", &[u, s])
        }

        fn remove_user_with_password(&mut self, u: &str, s: &str, p: &str) -> BackendResult<bool> {
            self.record("remove_user_with_password", &[u, s, p])
        }
    }

    fn request(command: &str) -> Request {
        Request {
            command: command.to_string(),
            username: "alice".to_string(),
            servername: "chat.example.org".to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[test]
    fn each_command_calls_exactly_one_operation() {
        let table = [
            ("auth", "authenticate", true),
            ("isuser", "user_exists", false),
            ("setpass", "set_password", true),
            ("tryregister", "register", true),
            ("removeuser", "remove_user", false),
            ("removeuser3", "remove_user_with_password", true),
        ];

        for (command, op, with_password) in table {
            let mut router = CommandRouter::new(RecordingBackend::answering(true));
            let dispatch = router.dispatch(&request(command));

            assert_eq!(dispatch.outcome, Outcome::Answered(true), "{command}");
            assert_eq!(dispatch.command.map(|c| c.as_str()), Some(command));

            let calls = &router.backend().calls;
            assert_eq!(calls.len(), 1, "{command}");
            assert_eq!(calls[0].0, op);

            let mut expected = vec!["alice", "chat.example.org"];
            if with_password {
                expected.push("s3cret");
            }
            assert_eq!(calls[0].1, expected, "{command}");
        }
    }

    #[test]
    fn backend_answer_is_passed_through() {
        for answer in [false, true] {
            let mut router = CommandRouter::new(RecordingBackend::answering(answer));
            let dispatch = router.dispatch(&request("auth"));
            assert_eq!(dispatch.outcome, Outcome::Answered(answer));
            assert_eq!(dispatch.response(), Response::new(answer));
        }
    }

    #[test]
    fn unrecognized_command_skips_backend() {
        let mut router = CommandRouter::new(RecordingBackend::answering(true));
        for command in ["AUTH", "isUser", "removeuser4", "ping", "auth "] {
            let dispatch = router.dispatch(&request(command));
            assert_eq!(dispatch.outcome, Outcome::Unrecognized);
            assert_eq!(dispatch.command, None);
            assert_eq!(dispatch.response(), Response::FAILURE);
        }
        assert!(router.into_backend().calls.is_empty());
    }

    #[test]
    fn malformed_payload_skips_backend() {
        let mut router = CommandRouter::new(RecordingBackend::answering(true));
        let payloads: [&[u8]; 3] = [b"", b":alice:chat.example.org:pw", b":"];
        for payload in payloads {
            let dispatch = router.dispatch_payload(payload);
            assert_eq!(dispatch.outcome, Outcome::Invalid);
            assert_eq!(dispatch.response(), Response::FAILURE);
        }
        assert!(router.backend().calls.is_empty());
    }

    #[test]
    fn backend_error_becomes_failure() {
        let mut router = CommandRouter::new(RecordingBackend::failing());
        let dispatch = router.dispatch(&request("tryregister"));
        assert_eq!(dispatch.command, Some(Command::TryRegister));
        assert_eq!(dispatch.outcome, Outcome::BackendFailed);
        assert_eq!(dispatch.response(), Response::FAILURE);
        assert_eq!(router.backend().calls.len(), 1);
    }

    #[test]
    fn dispatch_payload_uses_positional_fields() {
        let mut router = CommandRouter::new(RecordingBackend::answering(false));
        let dispatch = router.dispatch_payload(b"isuser:x");
        assert_eq!(dispatch.outcome, Outcome::Answered(false));
        assert_eq!(
            router.backend().calls,
            vec![("user_exists", vec!["x".to_string(), String::new()])]
        );
    }
}
