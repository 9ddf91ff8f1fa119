//! Logging setup for the automation service
//!
//! Installs a global `tracing` subscriber shaped by the logging
//! configuration domain.

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing};
