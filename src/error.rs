//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Boxed error returned by user-supplied entity transformers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Server-side failures; each maps to exactly one status code.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

/// Client-side failures surfaced by resource actions.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("invalid endpoint template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: &'static str },
    #[error("API response is not JSON: {body}")]
    MalformedResponse {
        body: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("transformer failed: {0}")]
    Transform(#[source] BoxError),
    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("transport: {0}")]
    Transport(String),
    #[error("action {action} expected {expected} but the response was {actual}")]
    ShapeMismatch {
        action: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("unknown behavior: {0}")]
    UnknownBehavior(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::MethodNotAllowed(_) => (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed"),
            AppError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_fixed_per_variant() {
        let cases = [
            (AppError::NotFound("books".into()), StatusCode::NOT_FOUND),
            (AppError::BadRequest("id".into()), StatusCode::BAD_REQUEST),
            (AppError::MethodNotAllowed("PATCH".into()), StatusCode::METHOD_NOT_ALLOWED),
            (AppError::Internal("lock".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn malformed_response_keeps_raw_body() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = ResourceError::MalformedResponse {
            body: "<html>".into(),
            source,
        };
        assert_eq!(err.to_string(), "API response is not JSON: <html>");
    }
}
