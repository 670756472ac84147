use rusqlite::Connection;

use crate::db::mapper::{self, Condition};
use crate::db::DatabaseError;
use crate::models::{Mri, MriAnnotationRow};

pub fn insert_mri(
    conn: &Connection,
    patient_id: i64,
    study_id: &str,
) -> Result<Mri, DatabaseError> {
    mapper::insert_row(
        conn,
        "mris",
        &[("patient_id", &patient_id), ("study_id", &study_id)],
        Mri::from_row,
    )
}

/// Annotations go with the study (ON DELETE CASCADE).
pub fn delete_mri(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    mapper::delete_rows(conn, "mris", Condition::new("id", &id))
}

/// Owning patient of a study, for lesional-flag upkeep after
/// annotation/MRI mutations.
pub fn mri_patient_id(conn: &Connection, mri_id: i64) -> Result<Option<i64>, DatabaseError> {
    match conn.query_row(
        "SELECT patient_id FROM mris WHERE id = ?1",
        [mri_id],
        |row| row.get(0),
    ) {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All MRIs of one patient left-joined with their annotations. An MRI
/// without annotations contributes one row with a NULL annotation side.
pub fn case_mri_rows(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<MriAnnotationRow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT mris.*, annotations.* FROM mris
         LEFT JOIN annotations ON annotations.mri_id = mris.id
         WHERE mris.patient_id = ?1
         ORDER BY mris.id, annotations.ann_id",
    )?;
    let rows = stmt.query_map([patient_id], MriAnnotationRow::from_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Join rows across all patients for export, optionally narrowed to
/// MRIs carrying an annotation with one of the given entity codes.
pub fn export_mri_rows(
    conn: &Connection,
    entity_codes: Option<&[String]>,
) -> Result<Vec<MriAnnotationRow>, DatabaseError> {
    let base = "SELECT mris.*, annotations.* FROM mris
                LEFT JOIN annotations ON annotations.mri_id = mris.id";
    let order = "ORDER BY mris.patient_id, mris.id, annotations.ann_id";

    match entity_codes {
        None => {
            let mut stmt = conn.prepare(&format!("{base} {order}"))?;
            let rows = stmt.query_map([], MriAnnotationRow::from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
        }
        Some(codes) => {
            let placeholders: Vec<String> =
                (1..=codes.len()).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "{base}
                 WHERE mris.id IN (
                     SELECT mri_id FROM annotations
                     WHERE entity_code IN ({})
                 )
                 {order}",
                placeholders.join(", ")
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows =
                stmt.query_map(rusqlite::params_from_iter(codes.iter()), MriAnnotationRow::from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
        }
    }
}
