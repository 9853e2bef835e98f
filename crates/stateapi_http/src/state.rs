//! Shared application state passed to all handlers via `axum::extract::State`.

use crate::error::ApiError;
use rusqlite::Connection;
use stateapi_core::db::{self, SharedConnection};
use stateapi_core::{SqliteStateRepository, StateService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    db: SharedConnection,
}

impl AppState {
    /// Takes ownership of a migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self::from_shared(db::share(conn))
    }

    pub fn from_shared(db: SharedConnection) -> Self {
        Self { db }
    }

    /// Runs `op` against a State service bound to the shared connection.
    ///
    /// `op` runs on the blocking pool so SQLite I/O never occupies a runtime
    /// worker. The connection lock lives only inside that blocking task.
    pub async fn with_states<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&StateService<SqliteStateRepository<'_>>) -> Result<T, ApiError>
            + Send
            + 'static,
        T: Send + 'static,
    {
        let shared = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let conn = db::lock(&shared)?;
            let service = StateService::new(SqliteStateRepository::try_new(&conn)?);
            op(&service)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("storage task failed: {err}")))?
    }
}
