//! Domain-driven configuration management for the automation service
//!
//! Configuration is split by functional domain (server, logging,
//! automation), with defaults for every field, environment variable
//! overrides and per-domain validation.

pub mod domains;
pub mod error;
pub mod loader;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

pub use domains::{
    automation::{AutomationConfig, ProcessDefinition, TaskDefinition},
    logging::{LogFormat, LogLevel, LoggingConfig},
    server::{CorsConfig, ServerConfig},
    AutomatorConfig,
};
