//! Generic row mapper — one parameterized-statement helper shared by all
//! typed repository functions.
//!
//! Each repository lists its own fixed column set and row mapping; this
//! module only assembles the statement, binds the values and classifies
//! SQLite failures into the crate error taxonomy. Table and column names
//! come exclusively from repository code, never from user input.

use rusqlite::{params_from_iter, Connection, Row, ToSql};

use super::DatabaseError;

/// Single-column equality condition. Compound keys are deliberately not
/// supported; every current caller addresses rows by a primary-key-like
/// column.
pub struct Condition<'a> {
    pub column: &'a str,
    pub value: &'a dyn ToSql,
}

impl<'a> Condition<'a> {
    pub fn new(column: &'a str, value: &'a dyn ToSql) -> Self {
        Self { column, value }
    }
}

/// Insert a row and return it in full, including database-generated
/// columns (id, defaults).
pub fn insert_row<T>(
    conn: &Connection,
    table: &str,
    fields: &[(&str, &dyn ToSql)],
    map_row: impl FnOnce(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<T, DatabaseError> {
    if fields.is_empty() {
        return Err(DatabaseError::NoFields(table.to_string()));
    }

    let columns: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({}) RETURNING *",
        columns.join(", "),
        placeholders.join(", ")
    );

    conn.query_row(
        &sql,
        params_from_iter(fields.iter().map(|(_, value)| *value)),
        map_row,
    )
    .map_err(|e| classify(table, e))
}

/// Update the row(s) matching the condition and return the post-update
/// row, or `None` when nothing matched. The condition value binds from
/// `condition`; a column listed in `fields` overrides only when the
/// caller explicitly includes it there.
pub fn update_row<T>(
    conn: &Connection,
    table: &str,
    fields: &[(&str, &dyn ToSql)],
    condition: Condition<'_>,
    map_row: impl FnOnce(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Option<T>, DatabaseError> {
    if fields.is_empty() {
        return Err(DatabaseError::NoFields(table.to_string()));
    }

    let assignments: Vec<String> = fields
        .iter()
        .enumerate()
        .map(|(i, (name, _))| format!("{name} = ?{}", i + 1))
        .collect();
    let sql = format!(
        "UPDATE {table} SET {} WHERE {} = ?{} RETURNING *",
        assignments.join(", "),
        condition.column,
        fields.len() + 1
    );

    let params = fields
        .iter()
        .map(|(_, value)| *value)
        .chain(std::iter::once(condition.value));

    match conn.query_row(&sql, params_from_iter(params), map_row) {
        Ok(row) => Ok(Some(row)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(classify(table, e)),
    }
}

/// Delete the row(s) matching the condition, returning the affected-row
/// count (0 means not found, a no-op for callers).
pub fn delete_rows(
    conn: &Connection,
    table: &str,
    condition: Condition<'_>,
) -> Result<usize, DatabaseError> {
    let sql = format!("DELETE FROM {table} WHERE {} = ?1", condition.column);
    conn.execute(&sql, [condition.value])
        .map_err(|e| classify(table, e))
}

/// Sort SQLite failures into the crate taxonomy: constraint violations
/// (duplicate key, missing foreign key) and schema mismatches (column or
/// table name unknown) are the two kinds callers react to.
fn classify(table: &str, err: rusqlite::Error) -> DatabaseError {
    match &err {
        rusqlite::Error::SqliteFailure(e, msg) => {
            if e.code == rusqlite::ErrorCode::ConstraintViolation {
                return DatabaseError::ConstraintViolation(
                    msg.clone().unwrap_or_else(|| e.to_string()),
                );
            }
            let reason = msg.clone().unwrap_or_default();
            if reason.contains("no such column")
                || reason.contains("has no column named")
                || reason.contains("no such table")
            {
                return DatabaseError::SchemaMismatch {
                    table: table.to_string(),
                    reason,
                };
            }
            DatabaseError::Sqlite(err)
        }
        _ => DatabaseError::Sqlite(err),
    }
}
