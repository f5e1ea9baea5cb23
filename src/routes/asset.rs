//! Static asset routes and the index fallback.

use crate::handlers::asset::{asset, index};
use crate::state::AppState;
use axum::{routing::any, Router};

pub const ASSET_PREFIX: &str = "/assets";

pub fn asset_routes(state: AppState) -> Router {
    Router::new()
        .route(&format!("{}/*path", ASSET_PREFIX), any(asset))
        .with_state(state)
}

/// Router whose fallback serves the index document for every unmatched path and verb.
pub fn index_fallback(state: AppState) -> Router {
    Router::new().fallback(index).with_state(state)
}
