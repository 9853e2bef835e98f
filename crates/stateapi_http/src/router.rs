//! Route table, request logging and JSON error normalization.

use crate::error::ApiError;
use crate::handlers::{
    create_state, delete_state, get_state, list_states, not_found, status, update_state,
};
use crate::state::AppState;
use axum::extract::Request;
use axum::http::header::{ALLOW, CONTENT_TYPE};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::info;
use std::time::Instant;

/// Mount point for every resource route.
pub const API_PREFIX: &str = "/api/v1";

/// Builds the full application router.
///
/// Every route is registered with and without a trailing slash. Error
/// responses produced by axum itself (405, 413, ...) are rewritten into the
/// JSON error body.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/status", get(status))
        .route("/status/", get(status))
        .route("/states", get(list_states).post(create_state))
        .route("/states/", get(list_states).post(create_state))
        .route(
            "/states/:state_id",
            get(get_state).put(update_state).delete(delete_state),
        )
        .route(
            "/states/:state_id/",
            get(get_state).put(update_state).delete(delete_state),
        );

    Router::new()
        .nest(API_PREFIX, api)
        .fallback(not_found)
        .layer(middleware::map_response(json_error_body))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    info!(
        "event=http_request module=http method={} path={} status={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}

async fn json_error_body(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(b"application/json"));
    if is_json {
        return response;
    }

    let mut replacement = ApiError::from_status(status).into_response();
    if let Some(allow) = response.headers().get(ALLOW) {
        replacement.headers_mut().insert(ALLOW, allow.clone());
    }
    replacement
}
