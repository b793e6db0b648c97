//! # Loggers
//!
//! `tracing` subscriber setup for binaries built on this library. The
//! library itself only emits `tracing` events.

/// Subscriber installation, optional log file and pruning of old log files.
pub mod setup;

pub use setup::{setup_logging, LogFormat, LoggingGuard};
