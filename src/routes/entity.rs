//! Entity API routes: `/api/:collection` and `/api/:collection/:id`, with or without a
//! trailing slash. Verbs without a handler answer 405; any other path under `/api` gets a
//! JSON error, never the index document.

use crate::handlers::entity::{
    create, create_at, delete as delete_handler, delete_without_id, list, method_not_allowed,
    read, replace, replace_at, unknown_api_path,
};
use crate::state::AppState;
use axum::{
    routing::{any, get, MethodRouter},
    Router,
};

pub const API_PREFIX: &str = "/api";

fn collection_methods() -> MethodRouter<AppState> {
    get(list)
        .post(create)
        .put(replace)
        .delete(delete_without_id)
        .fallback(method_not_allowed)
}

fn record_methods() -> MethodRouter<AppState> {
    get(read)
        .post(create_at)
        .put(replace_at)
        .delete(delete_handler)
        .fallback(method_not_allowed)
}

pub fn entity_routes(state: AppState) -> Router {
    let api = Router::new()
        .route("/:collection", collection_methods())
        .route("/:collection/", collection_methods())
        .route("/:collection/:id", record_methods())
        .route("/:collection/:id/", record_methods())
        .fallback(unknown_api_path)
        .with_state(state);
    Router::new()
        .nest(API_PREFIX, api)
        .route(&format!("{}/", API_PREFIX), any(unknown_api_path))
}
