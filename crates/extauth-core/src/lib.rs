//! Shared plumbing for the extauth crates.

pub mod tracing;

pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
