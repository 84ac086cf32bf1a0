//! Router extension traits for axum-like API.

use axum::Router;

use crate::routes::{fallback_handler, health_routes};
use crate::ServerConfig;

/// Extension trait for Router that provides plinth functionality.
///
/// This trait makes plinth-http feel like native axum code by providing
/// chainable methods on Router.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get};
/// use plinth_http::RouterExt;
///
/// let app = Router::new()
///     .route("/api/users", get(list_users))
///     .with_health_check()
///     .with_fallback()
///     .with_default_layers(&config);
///
/// app.serve(&config).await?;
/// ```
pub trait RouterExt: Sized {
    /// Adds a health check route (`GET /health`).
    ///
    /// Equivalent to `.merge(health_routes())`.
    fn with_health_check(self) -> Self;

    /// Adds a JSON 404 fallback handler for unmatched routes.
    ///
    /// Equivalent to `.fallback(fallback_handler)`.
    fn with_fallback(self) -> Self;

    /// Applies the default middleware stack.
    ///
    /// Layers applied (innermost to outermost):
    /// - `SetRequestIdLayer` / `PropagateRequestIdLayer` - X-Request-Id handling
    /// - `TraceLayer` - Request/response logging with latency
    /// - `TimeoutLayer` - Request timeout from config, returns 408
    /// - `CorsLayer` - CORS support (feature: `cors`, when origins configured)
    /// - `JsonErrorLayer` - Converts error responses to JSON (outermost)
    fn with_default_layers(self, config: &impl AsRef<ServerConfig>) -> Self;

    /// Serve the router with graceful shutdown support.
    ///
    /// Handles `SIGINT` (Ctrl+C) and `SIGTERM` signals, draining in-flight
    /// requests for at most the configured drain timeout before remaining
    /// connections are force-closed.
    fn serve(
        self,
        config: &(impl AsRef<ServerConfig> + Sync),
    ) -> impl std::future::Future<Output = Result<(), crate::ServerError>> + Send;
}

impl RouterExt for Router {
    fn with_health_check(self) -> Self {
        self.merge(health_routes())
    }

    fn with_fallback(self) -> Self {
        self.fallback(fallback_handler)
    }

    fn with_default_layers(self, config: &impl AsRef<ServerConfig>) -> Self {
        crate::layer::default_layers(self, config.as_ref())
    }

    async fn serve(
        self,
        config: &(impl AsRef<ServerConfig> + Sync),
    ) -> Result<(), crate::ServerError> {
        crate::server::serve_router(self, config).await
    }
}
