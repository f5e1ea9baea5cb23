//! Response helpers: API bodies are bare JSON, assets carry an extension-derived type.

use axum::{
    body::Bytes,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const JAVASCRIPT: &str = "application/javascript";
pub const HTML: &str = "text/html";
pub const PLAIN_TEXT: &str = "text/plain";

/// 200 with the value serialized as JSON.
pub fn json_ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

/// 200 with no body and no content type (successful DELETE).
pub fn empty_ok() -> StatusCode {
    StatusCode::OK
}

/// Content type from the file extension: `.js`, `.html`, anything else is plain text.
pub fn content_type_for(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("js") => JAVASCRIPT,
        Some("html") => HTML,
        _ => PLAIN_TEXT,
    }
}

/// 200 with the file bytes untouched.
pub fn file_ok(path: &str, content: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type_for(path))],
        Bytes::from(content),
    )
        .into_response()
}

pub fn asset_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, PLAIN_TEXT)],
        "Not found",
    )
        .into_response()
}
