//! The extauth run loop.
//!
//! One frame in, one response out, until the input stream closes:
//!
//! ```text
//! Uninitialized -> StreamsBound -> AwaitingFrame <-> Cycling
//!                                       |
//!                                       +-> Shutdown (read failure / EOF)
//! ```
//!
//! Everything happens on the calling thread. Reads block without a timeout;
//! the XMPP server sends one request at a time and waits for its answer.

use std::io::{Read, Write};

use tracing::{debug, error, info, warn};

use extauth_protocol::{FrameReader, FrameWriter, ProtocolError, Response};

use crate::backend::AuthBackend;
use crate::config::{EmptyFramePolicy, ServiceConfig};
use crate::error::ServiceResult;
use crate::router::{CommandRouter, Dispatch, Outcome};
use crate::stream::{StreamSource, Stdio};

/// Lifecycle of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Streams have not been opened.
    Uninitialized,
    /// Streams are open; the loop has not started reading.
    StreamsBound,
    /// Blocked on the next length prefix.
    AwaitingFrame,
    /// Handling one request.
    Cycling,
    /// The input stream is gone; the loop has exited.
    Shutdown,
}

/// Counters for one run of the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Complete, non-empty frames handed to the router.
    pub requests: u64,
    /// Responses carrying `true`.
    pub succeeded: u64,
    /// Responses carrying `false`.
    pub failed: u64,
    /// Response frames fully written.
    pub responses_written: u64,
    /// Response frames that could not be written.
    pub write_failures: u64,
    /// Frames with a zero length prefix.
    pub empty_frames: u64,
    /// Frames cut short by the end of the input stream.
    pub truncated_frames: u64,
    /// Payloads without a command.
    pub invalid_requests: u64,
    /// Commands outside the known set.
    pub unrecognized_commands: u64,
    /// Backend calls that returned an error.
    pub backend_errors: u64,
}

impl CycleStats {
    fn record(&mut self, dispatch: &Dispatch) {
        self.requests += 1;
        match dispatch.outcome {
            Outcome::Answered(_) => {}
            Outcome::BackendFailed => self.backend_errors += 1,
            Outcome::Unrecognized => self.unrecognized_commands += 1,
            Outcome::Invalid => self.invalid_requests += 1,
        }
    }
}

/// Answers extauth requests from an XMPP server using an [`AuthBackend`].
///
/// # Example
///
/// ```rust,no_run
/// use extauth_server::{AuthenticationService, UnconfiguredBackend};
///
/// let mut service = AuthenticationService::new(UnconfiguredBackend::default());
/// let stats = service.run()?;
/// println!("answered {} requests", stats.requests);
/// # Ok::<(), extauth_server::ServiceError>(())
/// ```
pub struct AuthenticationService<B, S = Stdio> {
    router: CommandRouter<B>,
    source: S,
    config: ServiceConfig,
    state: ServiceState,
}

impl<B: AuthBackend> AuthenticationService<B, Stdio> {
    /// Creates a service that talks over the process's stdin and stdout.
    pub fn new(backend: B) -> Self {
        Self::with_source(backend, Stdio)
    }
}

impl<B: AuthBackend, S: StreamSource> AuthenticationService<B, S> {
    /// Creates a service that takes its streams from `source`.
    pub fn with_source(backend: B, source: S) -> Self {
        Self {
            router: CommandRouter::new(backend),
            source,
            config: ServiceConfig::default(),
            state: ServiceState::Uninitialized,
        }
    }

    /// Builder: set the service configuration.
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// Returns true while the loop is allowed to keep reading.
    pub fn may_run(&self) -> bool {
        matches!(
            self.state,
            ServiceState::StreamsBound | ServiceState::AwaitingFrame | ServiceState::Cycling
        )
    }

    /// Returns a reference to the backend.
    pub fn backend(&self) -> &B {
        self.router.backend()
    }

    /// Binds the streams and serves requests until the input closes.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::StreamBind`](crate::ServiceError::StreamBind)
    /// if the streams cannot be opened. The loop never starts in that case
    /// and the state stays where it was.
    pub fn run(&mut self) -> ServiceResult<CycleStats> {
        let (reader, writer) = match self.source.bind() {
            Ok(streams) => streams,
            Err(e) => {
                error!(error = %e, "Failed to bind streams, not starting");
                return Err(e);
            }
        };
        self.state = ServiceState::StreamsBound;

        Ok(self.serve(reader, writer))
    }

    /// Serves requests from already open streams until the input closes.
    pub fn serve<R: Read, W: Write>(&mut self, reader: R, writer: W) -> CycleStats {
        let mut reader = FrameReader::new(reader);
        let mut writer = FrameWriter::new(writer);
        let mut stats = CycleStats::default();

        self.state = ServiceState::StreamsBound;
        info!(empty_frame = %self.config.empty_frame, "Awaiting requests");

        while self.may_run() {
            self.state = ServiceState::AwaitingFrame;

            let payload = match reader.read_frame() {
                Ok(payload) => payload,
                Err(ProtocolError::EmptyFrame) => {
                    stats.empty_frames += 1;
                    match self.config.empty_frame {
                        EmptyFramePolicy::Ignore => {
                            debug!("Ignoring empty frame");
                        }
                        EmptyFramePolicy::RespondFailure => {
                            debug!("Answering empty frame with failure");
                            respond(&mut writer, Response::FAILURE, &mut stats);
                        }
                    }
                    continue;
                }
                Err(ProtocolError::TruncatedFrame { expected, received }) => {
                    stats.truncated_frames += 1;
                    warn!(expected, received, "Input ended inside a frame");
                    respond(&mut writer, Response::FAILURE, &mut stats);
                    continue;
                }
                // read_frame reports every other failure as StreamRead
                Err(e) => {
                    error!(error = %e, "Unable to read from input stream, shutting down");
                    self.state = ServiceState::Shutdown;
                    break;
                }
            };

            self.state = ServiceState::Cycling;
            let _span = tracing::debug_span!("cycle", seq = stats.requests + 1).entered();
            debug!(bytes = payload.len(), "Input detected");

            let dispatch = self.router.dispatch_payload(&payload);
            stats.record(&dispatch);
            respond(&mut writer, dispatch.response(), &mut stats);
        }

        info!(
            requests = stats.requests,
            succeeded = stats.succeeded,
            failed = stats.failed,
            write_failures = stats.write_failures,
            empty_frames = stats.empty_frames,
            truncated_frames = stats.truncated_frames,
            invalid_requests = stats.invalid_requests,
            unrecognized_commands = stats.unrecognized_commands,
            backend_errors = stats.backend_errors,
            "Service stopped"
        );

        stats
    }
}

fn respond<W: Write>(writer: &mut FrameWriter<W>, response: Response, stats: &mut CycleStats) {
    let result = response.is_success();
    if result {
        stats.succeeded += 1;
    } else {
        stats.failed += 1;
    }

    match writer.write_response(response) {
        Ok(()) => {
            stats.responses_written += 1;
            debug!(result, "Wrote response");
        }
        Err(e) => {
            stats.write_failures += 1;
            error!(error = %e, result, "Failed to write response");
        }
    }
}
