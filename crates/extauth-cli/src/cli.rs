//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use extauth_core::TracingOutputFormat;
use extauth_server::EmptyFramePolicy;

/// extauth - external authentication program for XMPP servers
///
/// Without a subcommand, answers authentication requests on stdin/stdout
/// until the XMPP server closes the pipe.
#[derive(Debug, Parser)]
#[command(name = "extauth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "EXTAUTH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output (on stderr)
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log format: pretty, compact or json
    #[arg(long, env = "EXTAUTH_LOG_FORMAT")]
    pub log_format: Option<TracingOutputFormat>,

    /// Answer to zero-length frames: ignore or respond-failure
    #[arg(long)]
    pub empty_frame: Option<EmptyFramePolicy>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the effective configuration
    Dump,

    /// Validate the configuration
    Validate,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "extauth",
            "--debug",
            "--log-format",
            "json",
            "--empty-frame",
            "respond-failure",
        ])
        .unwrap();

        assert!(cli.debug);
        assert_eq!(cli.log_format, Some(TracingOutputFormat::Json));
        assert_eq!(cli.empty_frame, Some(EmptyFramePolicy::RespondFailure));
        assert!(cli.command.is_none());
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(Cli::try_parse_from(["extauth", "--empty-frame", "drop"]).is_err());
    }

    #[test]
    fn parses_config_subcommand() {
        let cli = Cli::try_parse_from(["extauth", "config", "path"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Path
            })
        ));
    }
}
