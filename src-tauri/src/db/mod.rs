pub mod mapper;
pub mod repository;
pub mod sqlite;

pub use mapper::*;
pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("Schema mismatch on table {table}: {reason}")]
    SchemaMismatch { table: String, reason: String },

    #[error("No fields supplied for table {0}")]
    NoFields(String),

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Invalid reference data: {0}")]
    ReferenceData(String),
}
