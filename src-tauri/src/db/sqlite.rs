use std::path::Path;

use rusqlite::Connection;

use super::DatabaseError;
use crate::dictionary;

/// Open a SQLite connection to the given path, run migrations and seed
/// the reference lookup tables.
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    dictionary::seed_reference_data(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    dictionary::seed_reference_data(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    // Cascade deletes (patient -> meld/mris, mri -> annotations) rely on
    // foreign_keys being on for every connection.
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![(
        1,
        include_str!("../../resources/migrations/001_initial.sql"),
    )];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql)
                .map_err(|e| DatabaseError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_initializes_all_tables() {
        let conn = open_memory_database().unwrap();
        // patients + meld + mris + annotations + form_controls + entities
        // + schema_version = 7
        let count = count_tables(&conn).unwrap();
        assert_eq!(count, 7, "Expected 7 tables, got {count}");
    }

    #[test]
    fn schema_version_is_current() {
        let conn = open_memory_database().unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn migration_idempotent() {
        let conn = open_memory_database().unwrap();
        // Run migrations again — should not error
        let result = run_migrations(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn foreign_keys_enabled() {
        let conn = open_memory_database().unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn database_opens_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meld.db");
        let conn = open_database(&path).unwrap();
        assert_eq!(count_tables(&conn).unwrap(), 7);

        // Re-open — should be idempotent
        let conn2 = open_database(&path).unwrap();
        assert_eq!(count_tables(&conn2).unwrap(), 7);
    }

    #[test]
    fn disk_database_uses_wal() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_database(&dir.path().join("meld.db")).unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }

    #[test]
    fn cascade_delete_patient_removes_dependents() {
        let conn = open_memory_database().unwrap();

        conn.execute(
            "INSERT INTO patients (kkb_id, firstname, surname) VALUES ('K1', 'Ada', 'Test')",
            [],
        )
        .unwrap();
        conn.execute("INSERT INTO meld (patient_id) VALUES (1)", [])
            .unwrap();
        conn.execute(
            "INSERT INTO mris (patient_id, study_id) VALUES (1, 'S-001')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO annotations (mri_id, entity_code) VALUES (1, 'FCD2B')",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM patients WHERE id = 1", []).unwrap();

        for table in ["meld", "mris", "annotations"] {
            let count: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })
                .unwrap();
            assert_eq!(count, 0, "{table} not emptied by cascade");
        }
    }

    #[test]
    fn cascade_delete_mri_removes_annotations() {
        let conn = open_memory_database().unwrap();

        conn.execute("INSERT INTO patients (surname) VALUES ('Test')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO mris (patient_id, study_id) VALUES (1, 'S-001')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO annotations (mri_id, entity_code) VALUES (1, 'HS')",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM mris WHERE id = 1", []).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM annotations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn mri_requires_existing_patient() {
        let conn = open_memory_database().unwrap();
        let result = conn.execute(
            "INSERT INTO mris (patient_id, study_id) VALUES (99, 'S-404')",
            [],
        );
        assert!(result.is_err());
    }
}
