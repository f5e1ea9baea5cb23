//! API handlers: CRUD over the entity store, one lock acquisition per request.

use crate::error::AppError;
use crate::response::{empty_ok, json_ok};
use crate::state::AppState;
use crate::store::{EntityStore, Record, ID_FIELD};
use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, State},
    http::Method,
    response::IntoResponse,
};
use serde_json::Value;
use std::sync::{RwLockReadGuard, RwLockWriteGuard};

fn parse_id(id_str: &str) -> Result<u64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {}", id_str)))
}

fn body_to_record(body: &Bytes) -> Result<Record, AppError> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(m)) => Ok(m),
        Ok(_) => Err(AppError::BadRequest("body must be a JSON object".into())),
        Err(e) => Err(AppError::BadRequest(format!("body is not JSON: {}", e))),
    }
}

fn read_store(state: &AppState) -> Result<RwLockReadGuard<'_, EntityStore>, AppError> {
    state
        .store
        .read()
        .map_err(|_| AppError::Internal("store lock poisoned".into()))
}

fn write_store(state: &AppState) -> Result<RwLockWriteGuard<'_, EntityStore>, AppError> {
    state
        .store
        .write()
        .map_err(|_| AppError::Internal("store lock poisoned".into()))
}

/// GET /api/:collection
pub async fn list(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let records = read_store(&state)?.list(&collection)?;
    Ok(json_ok(records))
}

/// GET /api/:collection/:id
pub async fn read(
    State(state): State<AppState>,
    Path((collection, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let record = read_store(&state)?.get(&collection, id)?;
    Ok(json_ok(record))
}

/// POST /api/:collection
pub async fn create(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let record = body_to_record(&body)?;
    let created = write_store(&state)?.create(&collection, record);
    Ok(json_ok(created))
}

/// POST /api/:collection/:id creates too; the id segment is ignored.
pub async fn create_at(
    state: State<AppState>,
    Path((collection, _id)): Path<(String, String)>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    create(state, Path(collection), body).await
}

/// PUT /api/:collection. The record names itself through its `id` field.
pub async fn replace(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let record = body_to_record(&body)?;
    let replaced = write_store(&state)?.replace(&collection, record)?;
    Ok(json_ok(replaced))
}

/// PUT /api/:collection/:id. The body's `id` wins; the path id only fills it in when absent.
pub async fn replace_at(
    State(state): State<AppState>,
    Path((collection, id_str)): Path<(String, String)>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let mut record = body_to_record(&body)?;
    record.entry(ID_FIELD).or_insert_with(|| Value::from(id));
    let replaced = write_store(&state)?.replace(&collection, record)?;
    Ok(json_ok(replaced))
}

/// DELETE /api/:collection/:id. Success has an empty body.
pub async fn delete(
    State(state): State<AppState>,
    Path((collection, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    write_store(&state)?.delete(&collection, id)?;
    Ok(empty_ok())
}

/// DELETE /api/:collection: deleting needs an id.
pub async fn delete_without_id(Path(_collection): Path<String>) -> AppError {
    AppError::BadRequest("id is required when deleting".into())
}

/// Any verb the API routes do not handle.
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method.to_string())
}

/// Paths under `/api` that name neither a collection nor a record.
pub async fn unknown_api_path(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    if method == Method::DELETE {
        AppError::BadRequest(format!("cannot delete {}", uri.path()))
    } else {
        AppError::NotFound(format!("no API route for {}", uri.path()))
    }
}
