//! HTTP surface for the State API.
//!
//! ```text
//! axum router (router.rs) ── method + path dispatch, request logging
//!        │
//! handlers/ ── JSON body validation, status codes, error mapping
//!        │
//! stateapi_core::StateService ── use cases
//!        │
//! stateapi_core::SqliteStateRepository ── persistence
//! ```

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::{create_router, API_PREFIX};
pub use state::AppState;
