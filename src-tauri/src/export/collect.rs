use rusqlite::Connection;

use crate::db::repository::{
    export_mri_rows, get_all_patients, meld_export_rows, patients_by_ids,
};
use crate::db::DatabaseError;
use crate::models::{CollectedData, ExportScope};

/// Take the snapshot an export run works from. When an entity-code
/// filter is given, the MRI join runs first and narrows every scope to
/// the patients owning a matching annotation; no matches mean an empty
/// export, not an error.
pub fn collect(
    conn: &Connection,
    scope: ExportScope,
    entities: Option<&str>,
) -> Result<CollectedData, DatabaseError> {
    let mut data = CollectedData::default();

    let codes: Vec<String> = entities
        .unwrap_or_default()
        .split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    let mut filtered_mris = None;
    let mut patient_filter: Option<Vec<i64>> = None;

    if !codes.is_empty() {
        let rows = export_mri_rows(conn, Some(&codes))?;
        if rows.is_empty() {
            tracing::info!(?codes, "Entity filter matched nothing, export is empty");
            return Ok(data);
        }
        let mut ids: Vec<i64> = Vec::new();
        for row in &rows {
            if !ids.contains(&row.mri.patient_id) {
                ids.push(row.mri.patient_id);
            }
        }
        patient_filter = Some(ids);
        filtered_mris = Some(rows);
    }

    if scope.patients {
        data.patients = Some(match &patient_filter {
            Some(ids) => patients_by_ids(conn, ids)?,
            None => get_all_patients(conn)?,
        });
    }

    if scope.melds {
        data.melds = Some(meld_export_rows(conn, patient_filter.as_deref())?);
    }

    if scope.mris {
        data.mris = Some(match filtered_mris {
            Some(rows) => rows,
            None => export_mri_rows(conn, None)?,
        });
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{create_case, insert_annotation, insert_mri};
    use crate::db::sqlite::open_memory_database;
    use crate::models::{AnnotationForm, NewPatient};

    fn seed_case(conn: &Connection, surname: &str, entity: Option<&str>) -> i64 {
        let patient = create_case(
            conn,
            &NewPatient {
                surname: surname.into(),
                ..Default::default()
            },
        )
        .unwrap();
        let mri = insert_mri(conn, patient.id, &format!("S-{surname}")).unwrap();
        if let Some(code) = entity {
            insert_annotation(
                conn,
                &AnnotationForm {
                    mri_id: mri.id,
                    entity_code: code.into(),
                    ..Default::default()
                },
            )
            .unwrap();
        }
        patient.id
    }

    #[test]
    fn collect_honors_scope_selection() {
        let conn = open_memory_database().unwrap();
        seed_case(&conn, "One", None);

        let data = collect(
            &conn,
            ExportScope {
                patients: true,
                melds: false,
                mris: true,
            },
            None,
        )
        .unwrap();

        assert!(data.patients.is_some());
        assert!(data.melds.is_none());
        assert_eq!(data.mris.unwrap().len(), 1);
    }

    #[test]
    fn entity_filter_narrows_every_scope() {
        let conn = open_memory_database().unwrap();
        let hit = seed_case(&conn, "Hit", Some("FCD2B"));
        seed_case(&conn, "Miss", Some("HS"));
        seed_case(&conn, "Bare", None);

        let data = collect(
            &conn,
            ExportScope {
                patients: true,
                melds: true,
                mris: true,
            },
            Some("FCD2B"),
        )
        .unwrap();

        let patients = data.patients.unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].id, hit);

        let melds = data.melds.unwrap();
        assert_eq!(melds.len(), 1);
        assert_eq!(melds[0].meld.patient_id, hit);

        assert!(data
            .mris
            .unwrap()
            .iter()
            .all(|row| row.mri.patient_id == hit));
    }

    #[test]
    fn unmatched_entity_filter_yields_empty_export() {
        let conn = open_memory_database().unwrap();
        seed_case(&conn, "Someone", Some("HS"));

        let data = collect(
            &conn,
            ExportScope {
                patients: true,
                melds: true,
                mris: true,
            },
            Some("GG, CAV"),
        )
        .unwrap();

        assert!(data.patients.is_none());
        assert!(data.melds.is_none());
        assert!(data.mris.is_none());
    }
}
