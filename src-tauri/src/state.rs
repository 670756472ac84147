use std::fs;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use thiserror::Error;

use crate::config;
use crate::db::sqlite::open_database;
use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("database lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("could not prepare application directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Global application state managed by Tauri. SQLite serializes writers
/// anyway, so a single mutex-guarded connection is enough for a
/// single-user desktop app.
pub struct AppState {
    db: Mutex<Connection>,
}

impl AppState {
    /// Open (or create) the on-disk database under the app data
    /// directory and run pending migrations.
    pub fn init() -> Result<Self, StateError> {
        let data_dir = config::app_data_dir();
        fs::create_dir_all(&data_dir)?;

        let db_path = config::database_path();
        tracing::info!(path = %db_path.display(), "Opening application database");
        let conn = open_database(&db_path)?;

        Ok(Self { db: Mutex::new(conn) })
    }

    /// Wrap an existing connection, for tests running against an
    /// in-memory database.
    pub fn from_connection(conn: Connection) -> Self {
        Self { db: Mutex::new(conn) }
    }

    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, StateError> {
        self.db.lock().map_err(|_| StateError::LockPoisoned)
    }
}
