use crate::error::ApiError;
use axum::Json;
use serde_json::{json, Value};

/// `GET /status`
pub async fn status() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
