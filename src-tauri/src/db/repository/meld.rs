use rusqlite::Connection;

use crate::db::mapper::{self, Condition};
use crate::db::DatabaseError;
use crate::models::{MeldExportRow, MeldRecord, MeldUpdate};

/// Insert the empty questionnaire row that accompanies every new
/// patient. All clinical columns materialize from their defaults.
pub fn insert_empty_meld(
    conn: &Connection,
    patient_id: i64,
) -> Result<MeldRecord, DatabaseError> {
    mapper::insert_row(
        conn,
        "meld",
        &[("patient_id", &patient_id)],
        MeldRecord::from_row,
    )
}

/// Insert a fully populated questionnaire row (import path).
pub fn insert_meld(conn: &Connection, meld: &MeldRecord) -> Result<MeldRecord, DatabaseError> {
    mapper::insert_row(conn, "meld", &meld.insert_fields(), MeldRecord::from_row)
}

pub fn get_meld(
    conn: &Connection,
    patient_id: i64,
) -> Result<Option<MeldRecord>, DatabaseError> {
    match conn.query_row(
        "SELECT * FROM meld WHERE patient_id = ?1",
        [patient_id],
        MeldRecord::from_row,
    ) {
        Ok(meld) => Ok(Some(meld)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Partial update keyed by patient id: only the supplied fields are
/// written. Returns `None` when the patient has no questionnaire row.
pub fn update_meld(
    conn: &Connection,
    update: &MeldUpdate,
) -> Result<Option<MeldRecord>, DatabaseError> {
    let fields = update.set_fields();
    if fields.is_empty() {
        // Nothing to write; report current state instead of erroring.
        return get_meld(conn, update.patient_id);
    }
    mapper::update_row(
        conn,
        "meld",
        &fields,
        Condition::new("patient_id", &update.patient_id),
        MeldRecord::from_row,
    )
}

/// Questionnaire rows joined with the demographic fields the export
/// shape carries (`sex`, completion marker), optionally narrowed to a
/// patient subset.
pub fn meld_export_rows(
    conn: &Connection,
    patient_ids: Option<&[i64]>,
) -> Result<Vec<MeldExportRow>, DatabaseError> {
    let base = "SELECT meld.*, patients.sex, patients.is_complete
                FROM meld JOIN patients ON patients.id = meld.patient_id";

    let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<MeldExportRow> {
        Ok(MeldExportRow {
            meld: MeldRecord::from_row(row)?,
            sex: row.get("sex")?,
            is_complete: row.get("is_complete")?,
        })
    };

    match patient_ids {
        None => {
            let mut stmt = conn.prepare(&format!("{base} ORDER BY meld.patient_id"))?;
            let rows = stmt.query_map([], map_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
        }
        Some(ids) => {
            let placeholders: Vec<String> =
                (1..=ids.len()).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "{base} WHERE meld.patient_id IN ({}) ORDER BY meld.patient_id",
                placeholders.join(", ")
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(rusqlite::params_from_iter(ids.iter()), map_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
        }
    }
}
