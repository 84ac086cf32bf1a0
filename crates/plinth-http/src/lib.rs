//! # plinth-http
//!
//! Axum-based HTTP kit for plinth servers.
//!
//! The centerpiece is the graceful-shutdown coordinator in [`server`]:
//! a one-shot lifecycle that runs an accept loop until it fails or a
//! termination signal arrives, then drains in-flight requests within a
//! bounded window and force-closes whatever remains.
//!
//! Around it the kit carries the pieces a starter server needs:
//! server configuration, a default middleware stack (request IDs,
//! request tracing, timeouts, optional CORS, JSON error envelopes),
//! health and 404 routes, and the [`RouterExt`] extension trait that
//! ties them together.
//!
//! ## Features
//!
//! - `tracing` - Logging initialization via plinth (default)
//! - `cors` - CORS layer driven by `ServerConfig::cors_origins`
//! - `full` - Everything above

mod config;
mod error;
mod layer;
mod router;
mod routes;
pub mod server;

pub use axum::http::StatusCode;

pub use plinth::{ConfigBuilder, ConfigError, Environment, LogFormat};

#[cfg(feature = "tracing")]
pub use plinth::{init_logging, init_logging_from_env};

pub use config::ServerConfig;
pub use error::{ErrorResponse, HttpError};
pub use layer::JsonErrorLayer;
pub use router::RouterExt;
pub use routes::{fallback_handler, health_routes};
pub use server::{serve_router, serve_with_shutdown, shutdown_signal, ServerError};
