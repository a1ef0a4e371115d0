//! Response shaping: the wire formats are a raw row array, `{"id": n}`,
//! and `{"message": s}` (no envelope).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

pub fn rows(rows: Vec<Value>) -> Response {
    Json(Value::Array(rows)).into_response()
}

/// The first element of a possibly-empty result set: the missing case is an
/// empty 200 body, not a 404.
pub fn row_or_empty(row: Option<Value>) -> Response {
    match row {
        Some(row) => Json(row).into_response(),
        None => StatusCode::OK.into_response(),
    }
}

pub fn created_id(id: i64) -> Response {
    Json(serde_json::json!({ "id": id })).into_response()
}

pub fn message(msg: &str) -> Response {
    Json(serde_json::json!({ "message": msg })).into_response()
}
