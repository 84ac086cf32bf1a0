use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Trait for converting errors into HTTP responses.
///
/// Handlers signal failure by returning an error that implements this
/// trait; there is no panic-based error path and no recovery middleware.
///
/// # Example
///
/// ```ignore
/// use plinth_http::HttpError;
/// use axum::http::StatusCode;
/// use axum::response::{IntoResponse, Response};
///
/// #[derive(Debug)]
/// enum AppError {
///     NotFound,
///     InvalidInput(String),
/// }
///
/// impl HttpError for AppError {
///     fn status_code(&self) -> StatusCode {
///         match self {
///             Self::NotFound => StatusCode::NOT_FOUND,
///             Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
///         }
///     }
///
///     fn message(&self) -> &str {
///         match self {
///             Self::NotFound => "Resource not found",
///             Self::InvalidInput(msg) => msg,
///         }
///     }
/// }
///
/// impl IntoResponse for AppError {
///     fn into_response(self) -> Response {
///         self.into_http_response()
///     }
/// }
/// ```
pub trait HttpError: std::fmt::Debug {
    fn status_code(&self) -> StatusCode;
    fn message(&self) -> &str;

    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        let body = ErrorResponse::new(self.message());
        (self.status_code(), axum::Json(body)).into_response()
    }
}

/// Standard JSON error envelope: `{"status":"error","message":...}`.
#[derive(Debug, Serialize, Clone)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_new() {
        let resp = ErrorResponse::new("Test message");
        assert_eq!(resp.status, "error");
        assert_eq!(resp.message, "Test message");
    }

    #[test]
    fn error_response_serializes_envelope() {
        let resp = ErrorResponse::new("Resource not found");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "message": "Resource not found"})
        );
    }

    #[derive(Debug)]
    struct TestError {
        status: StatusCode,
        msg: String,
    }

    impl HttpError for TestError {
        fn status_code(&self) -> StatusCode {
            self.status
        }

        fn message(&self) -> &str {
            &self.msg
        }
    }

    #[test]
    fn http_error_into_response() {
        let err = TestError {
            status: StatusCode::NOT_FOUND,
            msg: "Not found".to_string(),
        };
        let response = err.into_http_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn http_error_bad_request() {
        let err = TestError {
            status: StatusCode::BAD_REQUEST,
            msg: "Invalid input".to_string(),
        };
        let response = err.into_http_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
