//! Domain model for the State resource.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep client-writable and server-managed fields apart.
//!
//! # Invariants
//! - Every State is identified by a stable `StateId`.
//! - Deletion removes the record; there are no tombstones.

pub mod state;
