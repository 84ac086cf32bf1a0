use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

/// Liveness route for starter servers: `GET /health` answers 200 with an
/// empty body for as long as the accept loop is serving requests.
pub fn health_routes() -> Router {
    Router::new().route("/health", get(|| async { StatusCode::OK }))
}
