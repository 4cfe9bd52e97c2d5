//! Authentication backend trait.
//!
//! This module defines the [`AuthBackend`] trait, the capability set the
//! service delegates every authentication decision to. Concrete backends
//! (LDAP, SQL, an HTTP API, ...) live outside this crate.

use std::fmt;

use thiserror::Error;

/// The category of a backend error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendErrorCode {
    /// The user store could not be reached.
    Unavailable,
    /// The backend does not implement the requested operation.
    Unsupported,
    /// Backend configuration is missing or invalid.
    Configuration,
    /// Unexpected failure inside the backend.
    Internal,
}

impl BackendErrorCode {
    /// Returns a human-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Unsupported => "unsupported",
            Self::Configuration => "configuration_error",
            Self::Internal => "internal_error",
        }
    }
}

impl fmt::Display for BackendErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error reported by a backend operation.
///
/// The router never propagates these; they turn into a failure response.
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct BackendError {
    code: BackendErrorCode,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl BackendError {
    /// Creates a new backend error with the given code and message.
    pub fn new(code: BackendErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::Unavailable, message)
    }

    /// Creates an unsupported operation error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::Unsupported, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::Configuration, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::Internal, message)
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> BackendErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A specialized Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// The operations an XMPP server can delegate to the authentication process.
///
/// Each operation answers yes or no. An `Err` means the backend could not
/// decide; the service answers "no" to the XMPP server in that case and keeps
/// running.
///
/// Calls happen one at a time from the service thread, so implementations
/// may keep connections or caches in `self` without locking.
///
/// # Example Implementation
///
/// ```ignore
/// struct LdapBackend {
///     conn: ldap3::LdapConn,
/// }
///
/// impl AuthBackend for LdapBackend {
///     fn authenticate(&mut self, user: &str, server: &str, password: &str) -> BackendResult<bool> {
///         let dn = format!("uid={user},ou={server}");
///         Ok(self.conn.simple_bind(&dn, password).map_err(|e| {
///             BackendError::unavailable("bind failed").with_source(e)
///         })?.success().is_ok())
///     }
///     // ... other methods
/// }
/// ```
pub trait AuthBackend {
    /// Checks `password` for `username@servername`.
    fn authenticate(
        &mut self,
        username: &str,
        servername: &str,
        password: &str,
    ) -> BackendResult<bool>;

    /// Checks whether `username@servername` exists.
    fn user_exists(&mut self, username: &str, servername: &str) -> BackendResult<bool>;

    /// Sets a new password for `username@servername`.
    fn set_password(
        &mut self,
        username: &str,
        servername: &str,
        password: &str,
    ) -> BackendResult<bool>;

    /// Creates `username@servername` with the given password.
    fn register(&mut self, username: &str, servername: &str, password: &str)
    -> BackendResult<bool>;

    /// Removes `username@servername` unconditionally.
    fn remove_user(&mut self, username: &str, servername: &str) -> BackendResult<bool>;

    /// Removes `username@servername` if `password` matches.
    fn remove_user_with_password(
        &mut self,
        username: &str,
        servername: &str,
        password: &str,
    ) -> BackendResult<bool>;
}

impl<B: AuthBackend + ?Sized> AuthBackend for &mut B {
    fn authenticate(&mut self, u: &str, s: &str, p: &str) -> BackendResult<bool> {
        (**self).authenticate(u, s, p)
    }

    fn user_exists(&mut self, u: &str, s: &str) -> BackendResult<bool> {
        (**self).user_exists(u, s)
    }

    fn set_password(&mut self, u: &str, s: &str, p: &str) -> BackendResult<bool> {
        (**self).set_password(u, s, p)
    }

    fn register(&mut self, u: &str, s: &str, p: &str) -> BackendResult<bool> {
        (**self).register(u, s, p)
    }

    fn remove_user(&mut self, u: &str, s: &str) -> BackendResult<bool> {
        (**self).remove_user(u, s)
    }

    fn remove_user_with_password(&mut self, u: &str, s: &str, p: &str) -> BackendResult<bool> {
        (**self).remove_user_with_password(u, s, p)
    }
}

impl<B: AuthBackend + ?Sized> AuthBackend for Box<B> {
    fn authenticate(&mut self, u: &str, s: &str, p: &str) -> BackendResult<bool> {
        (**self).authenticate(u, s, p)
    }

    fn user_exists(&mut self, u: &str, s: &str) -> BackendResult<bool> {
        (**self).user_exists(u, s)
    }

    fn set_password(&mut self, u: &str, s: &str, p: &str) -> BackendResult<bool> {
        (**self).set_password(u, s, p)
    }

    fn register(&mut self, u: &str, s: &str, p: &str) -> BackendResult<bool> {
        (**self).register(u, s, p)
    }

    fn remove_user(&mut self, u: &str, s: &str) -> BackendResult<bool> {
        (**self).remove_user(u, s)
    }

    fn remove_user_with_password(&mut self, u: &str, s: &str, p: &str) -> BackendResult<bool> {
        (**self).remove_user_with_password(u, s, p)
    }
}

/// A backend that fails every operation.
///
/// Used when no real backend has been wired in: every request is answered
/// with a failure response and the reason is logged.
#[derive(Debug, Clone)]
pub struct UnconfiguredBackend {
    reason: String,
}

impl UnconfiguredBackend {
    /// Creates a backend that reports `reason` for every call.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn fail(&self) -> BackendResult<bool> {
        Err(BackendError::configuration(self.reason.clone()))
    }
}

impl Default for UnconfiguredBackend {
    fn default() -> Self {
        Self::new("no authentication backend configured")
    }
}

impl AuthBackend for UnconfiguredBackend {
    fn authenticate(&mut self, _: &str, _: &str, _: &str) -> BackendResult<bool> {
        self.fail()
    }

    fn user_exists(&mut self, _: &str, _: &str) -> BackendResult<bool> {
        self.fail()
    }

    fn set_password(&mut self, _: &str, _: &str, _: &str) -> BackendResult<bool> {
        self.fail()
    }

    fn register(&mut self, _: &str, _: &str, _: &str) -> BackendResult<bool> {
        self.fail()
    }

    fn remove_user(&mut self, _: &str, _: &str) -> BackendResult<bool> {
        self.fail()
    }

    fn remove_user_with_password(&mut self, _: &str, _: &str, _: &str) -> BackendResult<bool> {
        self.fail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_creation() {
        let err = BackendError::unavailable("ldap down");
        assert_eq!(err.code(), BackendErrorCode::Unavailable);
        assert_eq!(err.message(), "ldap down");
        assert_eq!(err.to_string(), "unavailable: ldap down");
    }

    #[test]
    fn backend_error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("connection reset");
        let err = BackendError::internal("query failed").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn unconfigured_backend_fails_everything() {
        let mut backend = UnconfiguredBackend::default();

        let results = [
            backend.authenticate("bob", "ex.com", "pw"),
            backend.user_exists("bob", "ex.com"),
            backend.set_password("bob", "ex.com", "pw"),
            backend.register("bob", "ex.com", "pw"),
            backend.remove_user("bob", "ex.com"),
            backend.remove_user_with_password("bob", "ex.com", "pw"),
        ];

        for result in results {
            let err = result.unwrap_err();
            assert_eq!(err.code(), BackendErrorCode::Configuration);
            assert_eq!(err.message(), "no authentication backend configured");
        }
    }

    #[test]
    fn boxed_and_borrowed_backends_delegate() {
        fn reason<B: AuthBackend>(mut backend: B) -> String {
            backend
                .remove_user("a", "b")
                .unwrap_err()
                .message()
                .to_string()
        }

        let boxed: Box<dyn AuthBackend> = Box::new(UnconfiguredBackend::new("boxed"));
        assert_eq!(reason(boxed), "boxed");

        let mut inner = UnconfiguredBackend::new("borrowed");
        assert_eq!(reason(&mut inner), "borrowed");
    }
}
