//! extauth entry point.

use std::process::ExitCode;

use clap::Parser;

use extauth_cli::cli::{Cli, Command, ConfigAction};
use extauth_cli::commands;
use extauth_cli::config::ClientConfig;
use extauth_cli::error::ClientResult;
use extauth_core::init_tracing;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // stdout belongs to the XMPP server
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ClientResult<()> {
    let mut config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };

    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    if let Some(policy) = cli.empty_frame {
        config.service.empty_frame = policy;
    }

    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        },
        None => {
            init_tracing(config.tracing_config(cli.debug)?)?;
            commands::run::serve(config.service_config())
        }
    }
}
