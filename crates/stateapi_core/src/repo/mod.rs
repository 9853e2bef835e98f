//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract the State service depends on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `State::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod state_repo;
