//! State repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the storage primitives (list/get/create/update/delete) the
//!   State service is built on.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `State::validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Every successful write is committed before returning.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::state::{State, StateFields, StateId, StateValidationError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const STATE_SELECT_SQL: &str = "SELECT
    id,
    name,
    extra,
    created_at,
    updated_at
FROM states";

const REQUIRED_TABLE: &str = "states";
const REQUIRED_COLUMNS: [&str; 5] = ["id", "name", "extra", "created_at", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for State persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(StateValidationError),
    Db(DbError),
    NotFound(StateId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "state not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted state data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StateValidationError> for RepoError {
    fn from(value: StateValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for State records.
pub trait StateRepository {
    fn list_states(&self) -> RepoResult<Vec<State>>;
    fn get_state(&self, id: StateId) -> RepoResult<Option<State>>;
    fn create_state(&self, state: &State) -> RepoResult<StateId>;
    fn update_state(&self, state: &State) -> RepoResult<()>;
    fn delete_state(&self, id: StateId) -> RepoResult<()>;
}

/// SQLite-backed State repository.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateRepository<'conn> {
    /// Wraps a connection after checking that its schema is fully migrated.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the `states`
    ///   table does not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let columns = table_columns(conn, REQUIRED_TABLE)?;
        if columns.is_empty() {
            return Err(RepoError::MissingRequiredTable(REQUIRED_TABLE));
        }
        if let Some(column) = REQUIRED_COLUMNS
            .into_iter()
            .find(|column| !columns.iter().any(|existing| existing == column))
        {
            return Err(RepoError::MissingRequiredColumn {
                table: REQUIRED_TABLE,
                column,
            });
        }

        Ok(Self { conn })
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn list_states(&self) -> RepoResult<Vec<State>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STATE_SELECT_SQL} ORDER BY created_at ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut states = Vec::new();

        while let Some(row) = rows.next()? {
            states.push(parse_state_row(row)?);
        }

        Ok(states)
    }

    fn get_state(&self, id: StateId) -> RepoResult<Option<State>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STATE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_state_row(row)?));
        }

        Ok(None)
    }

    fn create_state(&self, state: &State) -> RepoResult<StateId> {
        state.validate()?;

        self.conn.execute(
            "INSERT INTO states (id, name, extra, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                state.id.to_string(),
                state.name.as_str(),
                extra_to_db(&state.extra)?,
                state.created_at.timestamp_millis(),
                state.updated_at.timestamp_millis(),
            ],
        )?;

        Ok(state.id)
    }

    fn update_state(&self, state: &State) -> RepoResult<()> {
        state.validate()?;

        // created_at is immutable; only the stored value is authoritative.
        let changed = self.conn.execute(
            "UPDATE states
             SET
                name = ?1,
                extra = ?2,
                updated_at = ?3
             WHERE id = ?4;",
            params![
                state.name.as_str(),
                extra_to_db(&state.extra)?,
                state.updated_at.timestamp_millis(),
                state.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(state.id));
        }

        Ok(())
    }

    fn delete_state(&self, id: StateId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM states WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let exists = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    if exists.is_none() {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

fn parse_state_row(row: &Row<'_>) -> RepoResult<State> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in states.id"))
    })?;

    let extra_text: String = row.get("extra")?;
    let extra = serde_json::from_str::<StateFields>(&extra_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid json object in states.extra: {err}"))
    })?;

    let state = State {
        id,
        name: row.get("name")?,
        created_at: parse_millis(row.get("created_at")?, "created_at")?,
        updated_at: parse_millis(row.get("updated_at")?, "updated_at")?,
        extra,
    };
    state
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("row {id_text}: {err}")))?;
    Ok(state)
}

fn parse_millis(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("timestamp `{value}` out of range in states.{column}"))
    })
}

fn extra_to_db(extra: &StateFields) -> RepoResult<String> {
    serde_json::to_string(extra)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode extra fields: {err}")))
}
