//! Route assembly: assets, API, then the index fallback for everything else.

pub mod asset;
pub mod entity;

pub use asset::{asset_routes, index_fallback, ASSET_PREFIX};
pub use entity::{entity_routes, API_PREFIX};

use crate::state::AppState;
use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

async fn log_response(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    tracing::info!(status = response.status().as_u16(), %method, %uri, "handled request");
    response
}

/// The full dev server: `/assets/*`, `/api/*`, and the index document for anything else.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;
    Router::new()
        .merge(asset_routes(state.clone()))
        .merge(entity_routes(state.clone()))
        .merge(index_fallback(state))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::from_fn(log_response))
}
