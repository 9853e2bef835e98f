//! Core domain logic for the State API.
//! This crate is the single source of truth for State invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::state::{State, StateFields, StateId, StateValidationError, IGNORED_KEYS};
pub use repo::state_repo::{RepoError, RepoResult, SqliteStateRepository, StateRepository};
pub use service::state_service::{ServiceError, ServiceResult, StateService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
