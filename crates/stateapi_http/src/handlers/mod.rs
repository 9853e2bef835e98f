//! Route handlers. Handlers stay thin; use cases live in `stateapi_core`.

pub mod states;
pub mod status;

pub use states::{create_state, delete_state, get_state, list_states, update_state};
pub use status::{not_found, status};
