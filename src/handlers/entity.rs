//! Generic entity CRUD handlers, parametrized by the descriptor resolved
//! from the request's path segment.

use crate::entity::{entity_by_path, EntityDef};
use crate::error::AppError;
use crate::response;
use crate::sql;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

fn resolve(segment: &str) -> Result<&'static EntityDef, AppError> {
    entity_by_path(segment).ok_or_else(|| AppError::NotFound(segment.to_string()))
}

/// The source coerced garbage path ids inside the database; a typed id has
/// to be parsed up front, so a non-numeric id becomes a 400 instead.
fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

fn body_to_map(value: Value) -> Result<HashMap<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m.into_iter().collect()),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Response, AppError> {
    let entity = resolve(&segment)?;
    let q = sql::select_all(entity);
    let rows = state.gateway.fetch_all(&q.sql, &q.params).await?;
    Ok(response::rows(rows))
}

pub async fn read(
    State(state): State<AppState>,
    Path((segment, id_str)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let entity = resolve(&segment)?;
    let id = parse_id(&id_str)?;
    let q = sql::select_by_id(entity, id);
    let row = state.gateway.fetch_optional(&q.sql, &q.params).await?;
    Ok(response::row_or_empty(row))
}

pub async fn create(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    let entity = resolve(&segment)?;
    let body = body_to_map(body)?;
    let q = sql::insert(entity, &body);
    let id = state.gateway.fetch_generated_id(&q.sql, &q.params).await?;
    Ok(response::created_id(id))
}

pub async fn update(
    State(state): State<AppState>,
    Path((segment, id_str)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    let entity = resolve(&segment)?;
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    let q = sql::update(entity, id, &body);
    // Match count deliberately not reported, same as the confirmation-only
    // contract of the source API.
    state.gateway.execute(&q.sql, &q.params).await?;
    Ok(response::message(entity.updated_message))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((segment, id_str)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let entity = resolve(&segment)?;
    let id = parse_id(&id_str)?;
    let q = sql::delete(entity, id);
    state.gateway.execute(&q.sql, &q.params).await?;
    Ok(response::message(entity.deleted_message))
}
