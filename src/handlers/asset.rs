//! Static assets by ordered root search, and the index document fallback.

use crate::error::AppError;
use crate::response::{asset_not_found, file_ok};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
};
use std::path::{Component, Path as FsPath};

/// Relative paths only; `..`, roots and prefixes never resolve.
fn is_safe_relative(path: &str) -> bool {
    FsPath::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// ANY /assets/*path: first root that can read the file wins.
pub async fn asset(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    if !is_safe_relative(&path) {
        tracing::warn!(path = %path, "rejected asset path");
        return asset_not_found();
    }
    for root in &state.config.static_dirs {
        let candidate = root.join(&path);
        match tokio::fs::read(&candidate).await {
            Ok(content) => return file_ok(&path, content),
            Err(e) => tracing::trace!(path = %candidate.display(), error = %e, "asset miss"),
        }
    }
    asset_not_found()
}

/// Every route that is neither an asset nor an API call, for any verb.
pub async fn index(State(state): State<AppState>) -> Result<Response, AppError> {
    let index_path = &state.config.index_path;
    let content = tokio::fs::read(index_path).await?;
    Ok(file_ok(&index_path.to_string_lossy(), content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_is_rejected() {
        assert!(is_safe_relative("books/book.html"));
        assert!(is_safe_relative("./app.js"));
        assert!(!is_safe_relative("../secret.txt"));
        assert!(!is_safe_relative("books/../../secret.txt"));
        assert!(!is_safe_relative("/etc/passwd"));
    }
}
