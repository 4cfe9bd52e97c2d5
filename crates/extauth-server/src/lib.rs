//! extauth service: the run loop, command router and backend trait.
//!
//! This crate answers an XMPP server's external authentication requests:
//! - Binds the process's stdin/stdout
//! - Decodes request frames and parses them into [`Request`](extauth_protocol::Request)s
//! - Routes each request to one [`AuthBackend`] operation
//! - Writes the boolean answer back as a response frame
//!
//! # Example
//!
//! ```rust,no_run
//! use extauth_server::{AuthenticationService, ServiceConfig, EmptyFramePolicy, UnconfiguredBackend};
//!
//! let config = ServiceConfig::new().with_empty_frame(EmptyFramePolicy::RespondFailure);
//! let mut service = AuthenticationService::new(UnconfiguredBackend::default()).with_config(config);
//! service.run()?;
//! # Ok::<(), extauth_server::ServiceError>(())
//! ```

mod backend;
mod config;
mod error;
mod router;
mod service;
mod stream;

pub use backend::{AuthBackend, BackendError, BackendErrorCode, BackendResult, UnconfiguredBackend};
pub use config::{EmptyFramePolicy, ServiceConfig};
pub use error::{ServiceError, ServiceResult};
pub use router::{CommandRouter, Dispatch, Outcome};
pub use service::{AuthenticationService, CycleStats, ServiceState};
pub use stream::{Preopened, Stdio, StreamSource};
