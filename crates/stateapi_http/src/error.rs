//! HTTP error mapping.
//!
//! Every failure becomes `{"error": "<description>"}` with a matching status.
//! Internal details are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use stateapi_core::db::DbError;
use stateapi_core::{RepoError, ServiceError, StateValidationError};
use std::fmt::{Display, Formatter};

pub const NOT_A_JSON: &str = "Not a JSON";
const NOT_FOUND: &str = "Not found";
const INTERNAL: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    /// Framework-level refusal (405, 413, 415, ...) carried with its status.
    Rejected(StatusCode),
    Internal(String),
}

impl ApiError {
    pub fn bad_request(description: impl Into<String>) -> Self {
        Self::BadRequest(description.into())
    }

    /// Maps a bare error status to its `ApiError`.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::NotFound,
            status if status.is_server_error() => {
                Self::Internal(format!("unhandled status {status}"))
            }
            status => Self::Rejected(status),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(status) => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing description.
    pub fn description(&self) -> &str {
        match self {
            Self::NotFound => NOT_FOUND,
            Self::BadRequest(description) => description,
            Self::Rejected(status) => status.canonical_reason().unwrap_or("Bad request"),
            Self::Internal(_) => INTERNAL,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Internal(detail) => write!(f, "{INTERNAL}: {detail}"),
            other => write!(f, "{}", other.description()),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            error!("event=http_error module=http status=error error={detail}");
        }
        let body = Json(json!({ "error": self.description() }));
        (self.status(), body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::NotFound(_) => Self::NotFound,
            ServiceError::Validation(
                err @ (StateValidationError::MissingName | StateValidationError::InvalidName),
            ) => Self::BadRequest(err.to_string()),
            ServiceError::Validation(err) => Self::Internal(err.to_string()),
            ServiceError::Repo(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        ServiceError::from(value).into()
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        Self::Internal(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use stateapi_core::{RepoError, ServiceError, StateValidationError};
    use uuid::Uuid;

    #[test]
    fn validation_errors_split_between_client_and_server() {
        let missing: ApiError =
            ServiceError::Validation(StateValidationError::MissingName).into();
        assert_eq!(missing, ApiError::bad_request("Missing name"));

        let nil: ApiError = ServiceError::Validation(StateValidationError::NilId).into();
        assert_eq!(nil.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn repo_not_found_maps_to_404_and_internal_detail_is_hidden() {
        let not_found: ApiError = RepoError::NotFound(Uuid::new_v4()).into();
        assert_eq!(not_found, ApiError::NotFound);

        let internal: ApiError = RepoError::InvalidData("bad row".to_string()).into();
        assert_eq!(internal.description(), "Internal server error");
        assert!(internal.to_string().contains("bad row"));
    }

    #[test]
    fn bare_statuses_keep_their_code_and_gain_a_description() {
        let not_allowed = ApiError::from_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(not_allowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(not_allowed.description(), "Method Not Allowed");

        assert_eq!(ApiError::from_status(StatusCode::NOT_FOUND), ApiError::NotFound);
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_GATEWAY).description(),
            "Internal server error"
        );
    }
}
