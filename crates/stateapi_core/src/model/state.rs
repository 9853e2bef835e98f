//! State domain model.
//!
//! # Responsibility
//! - Define the canonical State record exposed over the HTTP API.
//! - Own the field-level rules for building and updating a State from
//!   client-provided JSON objects.
//!
//! # Invariants
//! - `id` is stable, non-nil and never reused for another State.
//! - `id`, `created_at` and `updated_at` are server-managed; client input
//!   for these keys is dropped.
//! - `updated_at` is never earlier than `created_at`.
//! - `extra` never carries a reserved key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a State.
pub type StateId = Uuid;

/// JSON object shape accepted by create/update paths.
pub type StateFields = Map<String, Value>;

/// Keys a client can never write.
pub const IGNORED_KEYS: [&str; 3] = ["id", "created_at", "updated_at"];

const NAME_KEY: &str = "name";

/// Validation failures for State construction and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValidationError {
    NilId,
    MissingName,
    InvalidName,
    UpdatedBeforeCreated {
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
}

impl Display for StateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "state id must not be nil"),
            Self::MissingName => write!(f, "Missing name"),
            Self::InvalidName => write!(f, "Name must be a string"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must be >= created_at ({created_at})"
            ),
        }
    }
}

impl Error for StateValidationError {}

/// Canonical State record.
///
/// Any non-reserved key a client sends is kept in `extra` and flattened back
/// into the JSON form, so clients see the same object shape they wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: StateFields,
}

impl State {
    /// Creates a new State with a generated id and fresh timestamps.
    pub fn new(name: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            extra: StateFields::new(),
        }
    }

    /// Builds a new State from a client JSON object.
    ///
    /// # Errors
    /// - `MissingName` when `name` is absent.
    /// - `InvalidName` when `name` is not a JSON string.
    pub fn from_fields(fields: &StateFields) -> Result<Self, StateValidationError> {
        let name = match fields.get(NAME_KEY) {
            None => return Err(StateValidationError::MissingName),
            Some(value) => parse_name(value)?,
        };

        let mut state = Self::new(name);
        for (key, value) in fields {
            if key == NAME_KEY || is_ignored_key(key) {
                continue;
            }
            state.extra.insert(key.clone(), value.clone());
        }
        Ok(state)
    }

    /// Applies a client JSON object as field assignments.
    ///
    /// Ignored keys are skipped; `name` must be a string; every other key is
    /// written to `extra`. Nothing is modified when validation fails.
    pub fn apply_fields(&mut self, fields: &StateFields) -> Result<(), StateValidationError> {
        let name = fields.get(NAME_KEY).map(parse_name).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        for (key, value) in fields {
            if key == NAME_KEY || is_ignored_key(key) {
                continue;
            }
            self.extra.insert(key.clone(), value.clone());
        }
        self.touch();
        Ok(())
    }

    /// Bumps `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = now_millis().max(self.created_at);
    }

    pub fn validate(&self) -> Result<(), StateValidationError> {
        if self.id.is_nil() {
            return Err(StateValidationError::NilId);
        }
        if self.updated_at < self.created_at {
            return Err(StateValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }
}

/// Returns whether `key` is server-managed and must be ignored on input.
pub fn is_ignored_key(key: &str) -> bool {
    IGNORED_KEYS.contains(&key)
}

fn parse_name(value: &Value) -> Result<String, StateValidationError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or(StateValidationError::InvalidName)
}

// Storage keeps millisecond precision; truncate here so a freshly created
// State compares equal to the same row read back.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::{is_ignored_key, State, StateValidationError};
    use serde_json::json;

    fn fields(value: serde_json::Value) -> super::StateFields {
        value.as_object().cloned().expect("test input must be an object")
    }

    #[test]
    fn ignored_keys_cover_server_managed_fields() {
        assert!(is_ignored_key("id"));
        assert!(is_ignored_key("created_at"));
        assert!(is_ignored_key("updated_at"));
        assert!(!is_ignored_key("name"));
    }

    #[test]
    fn from_fields_drops_reserved_keys_and_keeps_extras() {
        let state = State::from_fields(&fields(json!({
            "name": "Nevada",
            "id": "client-id",
            "created_at": "yesterday",
            "capital": "Carson City"
        })))
        .unwrap();

        assert_eq!(state.name, "Nevada");
        assert_ne!(state.id.to_string(), "client-id");
        assert_eq!(state.extra.len(), 1);
        assert_eq!(state.extra["capital"], "Carson City");
    }

    #[test]
    fn apply_fields_rejects_non_string_name_without_partial_writes() {
        let mut state = State::new("Ohio");
        let before = state.clone();

        let err = state
            .apply_fields(&fields(json!({"name": 3, "motto": "With God"})))
            .unwrap_err();

        assert_eq!(err, StateValidationError::InvalidName);
        assert_eq!(state, before);
    }
}
