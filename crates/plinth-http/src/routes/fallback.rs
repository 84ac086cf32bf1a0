use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::ErrorResponse;

/// Returns a JSON 404 response for unmatched routes.
pub async fn fallback_handler() -> Response {
    let body = ErrorResponse::new("Resource not found");
    (StatusCode::NOT_FOUND, axum::Json(body)).into_response()
}
