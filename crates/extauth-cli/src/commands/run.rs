//! Default command: answer extauth requests on stdin/stdout.

use tracing::info;

use extauth_server::{AuthenticationService, ServiceConfig, UnconfiguredBackend};

use crate::error::ClientResult;

/// Runs the service until the XMPP server closes stdin.
///
/// No credential store ships with this binary, so every request is answered
/// with a failure. Deployments embed the library with their own backend.
pub fn serve(config: ServiceConfig) -> ClientResult<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "Starting extauth");

    let mut service = AuthenticationService::new(UnconfiguredBackend::default()).with_config(config);
    service.run()?;
    Ok(())
}
