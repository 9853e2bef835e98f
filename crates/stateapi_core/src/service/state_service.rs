//! State use-case service.
//!
//! # Responsibility
//! - Provide the CRUD entry points the HTTP handler calls.
//! - Turn client JSON objects into validated State writes.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Lookups happen before input is applied, so a missing id always wins
//!   over a bad body.

use crate::model::state::{State, StateFields, StateId, StateValidationError};
use crate::repo::state_repo::{RepoError, StateRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by State use cases.
#[derive(Debug)]
pub enum ServiceError {
    NotFound(StateId),
    Validation(StateValidationError),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "state not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<StateValidationError> for ServiceError {
    fn from(value: StateValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Use-case service wrapper for State CRUD operations.
pub struct StateService<R: StateRepository> {
    repo: R,
}

impl<R: StateRepository> StateService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every stored State.
    pub fn list_states(&self) -> ServiceResult<Vec<State>> {
        Ok(self.repo.list_states()?)
    }

    /// Gets one State, or `NotFound`.
    pub fn get_state(&self, id: StateId) -> ServiceResult<State> {
        self.repo.get_state(id)?.ok_or(ServiceError::NotFound(id))
    }

    /// Deletes one State, or `NotFound` when it does not exist.
    pub fn delete_state(&self, id: StateId) -> ServiceResult<()> {
        self.repo.delete_state(id)?;
        info!("event=state_delete module=service status=ok state_id={id}");
        Ok(())
    }

    /// Creates a State from a client JSON object.
    ///
    /// # Contract
    /// - `name` is required and must be a string.
    /// - `id`, `created_at`, `updated_at` in `fields` are ignored.
    /// - Any other key is stored as an extra field.
    pub fn create_state(&self, fields: &StateFields) -> ServiceResult<State> {
        let state = State::from_fields(fields).map_err(|err| {
            warn!("event=state_create module=service status=rejected reason={err:?}");
            err
        })?;
        self.repo.create_state(&state)?;
        info!(
            "event=state_create module=service status=ok state_id={} extra_fields={}",
            state.id,
            state.extra.len()
        );
        Ok(state)
    }

    /// Applies a client JSON object to an existing State.
    ///
    /// # Contract
    /// - Returns `NotFound` before looking at `fields`.
    /// - Every key except `id`, `created_at`, `updated_at` is assigned.
    /// - `updated_at` is bumped.
    pub fn update_state(&self, id: StateId, fields: &StateFields) -> ServiceResult<State> {
        let mut state = self.get_state(id)?;
        state.apply_fields(fields).map_err(|err| {
            warn!("event=state_update module=service status=rejected state_id={id} reason={err:?}");
            err
        })?;
        self.repo.update_state(&state)?;
        info!("event=state_update module=service status=ok state_id={id}");
        Ok(state)
    }
}
