//! Automation server
//!
//! Wires configuration, logging, the process and task registries and the
//! REST API into a runnable HTTP server, optionally serving the bundled web
//! UI from a static directory.

pub mod services;
pub mod startup;

pub use services::ServiceContainer;
pub use startup::{shutdown_signal, Server};
