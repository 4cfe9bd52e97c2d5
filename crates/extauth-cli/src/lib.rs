//! Command-line entry point for the extauth service.
//!
//! This crate provides the `extauth` binary an XMPP server spawns as its
//! external authentication program.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
