//! Application routes and handlers.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use plinth_http::{HttpError, RouterExt, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::state::AppState;

#[derive(Debug)]
enum ApiError {
    EmptyName,
}

impl HttpError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyName => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::EmptyName => "Query parameter 'name' must not be empty",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

async fn home(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": format!("Welcome to {}!", state.config.app.name),
        "data": {
            "version": state.config.app.version,
        }
    }))
}

async fn status(State(state): State<AppState>) -> Json<Value> {
    tracing::info!("Status endpoint accessed");

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    Json(json!({
        "status": "success",
        "message": "Server is running",
        "data": {
            "timestamp": timestamp,
            "uptime_secs": state.uptime_secs(),
            "version": state.config.app.version,
        }
    }))
}

#[derive(Deserialize)]
struct HelloParams {
    name: Option<String>,
}

async fn hello(Query(params): Query<HelloParams>) -> Result<String, ApiError> {
    match params.name.as_deref() {
        Some("") => Err(ApiError::EmptyName),
        Some(name) => Ok(format!("Hello, {}!", name)),
        None => Ok("Hello, World!".to_string()),
    }
}

/// Builds the full application router: the three app routes plus the
/// kit's health check, JSON 404 fallback, and default middleware.
pub fn router(state: AppState) -> Router {
    let server_config = state.config.server.clone();

    Router::new()
        .route("/", get(home))
        .route("/status", get(status))
        .route("/hello", get(hello))
        .with_state(state)
        .with_health_check()
        .with_fallback()
        .with_default_layers(&server_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_router() -> Router {
        router(AppState::new(AppConfig::default()))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn home_returns_welcome_envelope() {
        let response = test_router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Welcome to Plinth Server!");
        assert_eq!(json["data"]["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn status_reports_uptime_and_timestamp() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Server is running");
        assert!(json["data"]["timestamp"].as_u64().unwrap() > 0);
        assert!(json["data"]["uptime_secs"].is_u64());
    }

    #[tokio::test]
    async fn hello_greets_by_name() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/hello?name=Ada")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"Hello, Ada!");
    }

    #[tokio::test]
    async fn hello_defaults_to_world() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/hello")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"Hello, World!");
    }

    #[tokio::test]
    async fn hello_rejects_empty_name() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/hello?name=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Query parameter 'name' must not be empty");
    }

    #[tokio::test]
    async fn health_check_is_wired() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_gets_json_404() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/does-not-exist")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Resource not found");
    }
}
