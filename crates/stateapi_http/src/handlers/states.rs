//! State resource handlers.
//!
//! # Contract
//! - Unknown, malformed or undecodable ids are `404`.
//! - A body that is not a non-empty JSON object is `400 Not a JSON`.
//! - On update the id lookup happens before the body is inspected.

use crate::error::{ApiError, NOT_A_JSON};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use stateapi_core::{State as StateRecord, StateFields, StateId};

type StateIdPath = Result<Path<String>, PathRejection>;

/// `GET /states`
pub async fn list_states(State(app): State<AppState>) -> Result<Json<Vec<StateRecord>>, ApiError> {
    let states = app
        .with_states(|service| Ok(service.list_states()?))
        .await?;
    Ok(Json(states))
}

/// `GET /states/:state_id`
pub async fn get_state(
    State(app): State<AppState>,
    state_id: StateIdPath,
) -> Result<Json<StateRecord>, ApiError> {
    let id = parse_state_id(state_id)?;
    let state = app
        .with_states(move |service| Ok(service.get_state(id)?))
        .await?;
    Ok(Json(state))
}

/// `DELETE /states/:state_id`
pub async fn delete_state(
    State(app): State<AppState>,
    state_id: StateIdPath,
) -> Result<Json<Value>, ApiError> {
    let id = parse_state_id(state_id)?;
    app.with_states(move |service| Ok(service.delete_state(id)?))
        .await?;
    Ok(Json(json!({})))
}

/// `POST /states`
pub async fn create_state(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<StateRecord>), ApiError> {
    let fields = parse_fields(&body)?;
    let state = app
        .with_states(move |service| Ok(service.create_state(&fields)?))
        .await?;
    Ok((StatusCode::CREATED, Json(state)))
}

/// `PUT /states/:state_id`
pub async fn update_state(
    State(app): State<AppState>,
    state_id: StateIdPath,
    body: Bytes,
) -> Result<Json<StateRecord>, ApiError> {
    let id = parse_state_id(state_id)?;
    let state = app
        .with_states(move |service| {
            service.get_state(id)?;
            let fields = parse_fields(&body)?;
            Ok(service.update_state(id, &fields)?)
        })
        .await?;
    Ok(Json(state))
}

// A segment that fails to percent-decode can never name a stored State.
fn parse_state_id(state_id: StateIdPath) -> Result<StateId, ApiError> {
    let Path(raw) = state_id.map_err(|_| ApiError::NotFound)?;
    StateId::parse_str(&raw).map_err(|_| ApiError::NotFound)
}

fn parse_fields(body: &[u8]) -> Result<StateFields, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) if !fields.is_empty() => Ok(fields),
        _ => Err(ApiError::bad_request(NOT_A_JSON)),
    }
}
