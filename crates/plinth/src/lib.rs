//! # plinth
//!
//! Shared groundwork for plinth server crates.
//!
//! This crate carries the pieces every server binary needs before it can
//! accept a single request: layered configuration loading, the application
//! environment, and logging initialization. The HTTP side lives in
//! `plinth-http`.
//!
//! ## Features
//!
//! - `tracing` - Enable logging initialization with tracing-subscriber

mod config;
mod environment;
mod logging;

pub use config::{ConfigBuilder, ConfigError, ConfigFormat};
pub use environment::Environment;
pub use logging::LogFormat;

#[cfg(feature = "tracing")]
pub use logging::{init_logging, init_logging_from_env};
