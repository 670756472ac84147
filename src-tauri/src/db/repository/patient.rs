use rusqlite::{params, Connection};

use crate::db::mapper::{self, Condition};
use crate::db::DatabaseError;
use crate::models::{AdvancedSearch, NewPatient, Patient};

pub fn insert_patient(
    conn: &Connection,
    patient: &NewPatient,
) -> Result<Patient, DatabaseError> {
    mapper::insert_row(
        conn,
        "patients",
        &[
            ("kkb_id", &patient.kkb_id),
            ("firstname", &patient.firstname),
            ("surname", &patient.surname),
            ("dob", &patient.dob),
            ("sex", &patient.sex),
            ("has_lesional_mri", &patient.has_lesional_mri),
            ("is_complete", &patient.is_complete),
        ],
        Patient::from_row,
    )
}

/// Overwrite a patient's demographic fields, keyed by id. Returns the
/// post-update row, or `None` when the id matches nothing.
pub fn update_patient(
    conn: &Connection,
    patient: &Patient,
) -> Result<Option<Patient>, DatabaseError> {
    mapper::update_row(
        conn,
        "patients",
        &[
            ("kkb_id", &patient.kkb_id),
            ("firstname", &patient.firstname),
            ("surname", &patient.surname),
            ("dob", &patient.dob),
            ("sex", &patient.sex),
            ("has_lesional_mri", &patient.has_lesional_mri),
            ("is_complete", &patient.is_complete),
        ],
        Condition::new("id", &patient.id),
        Patient::from_row,
    )
}

pub fn delete_patient(conn: &Connection, id: i64) -> Result<usize, DatabaseError> {
    mapper::delete_rows(conn, "patients", Condition::new("id", &id))
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    match conn.query_row(
        "SELECT * FROM patients WHERE id = ?1",
        [id],
        Patient::from_row,
    ) {
        Ok(patient) => Ok(Some(patient)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Case list for the home screen, ordered by surname.
pub fn get_all_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT * FROM patients ORDER BY surname")?;
    let rows = stmt.query_map([], Patient::from_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Patient subset for entity-filtered exports, in id order.
pub fn patients_by_ids(
    conn: &Connection,
    ids: &[i64],
) -> Result<Vec<Patient>, DatabaseError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "SELECT * FROM patients WHERE id IN ({}) ORDER BY id",
        placeholders.join(", ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(ids.iter()), Patient::from_row)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}

/// Advanced search: exact study id, or presence of an annotation with
/// the given entity code. Both modes order by surname; empty filters
/// return an empty list.
pub fn search_advanced(
    conn: &Connection,
    filters: &AdvancedSearch,
) -> Result<Vec<Patient>, DatabaseError> {
    let study_id = filters.study_id.trim();
    if !study_id.is_empty() {
        let mut stmt = conn.prepare(
            "SELECT * FROM patients WHERE id IN (
                 SELECT patient_id FROM mris WHERE study_id = ?1
             )
             ORDER BY surname",
        )?;
        let rows = stmt.query_map([study_id], Patient::from_row)?;
        return rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into);
    }

    let entity_code = filters.entity_code.trim();
    if !entity_code.is_empty() {
        let mut stmt = conn.prepare(
            "SELECT * FROM patients WHERE id IN (
                 SELECT patient_id FROM mris WHERE id IN (
                     SELECT mri_id FROM annotations WHERE entity_code = ?1
                 )
             )
             ORDER BY surname",
        )?;
        let rows = stmt.query_map([entity_code], Patient::from_row)?;
        return rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into);
    }

    Ok(Vec::new())
}

/// Recompute the derived `has_lesional_mri` cache ("does this patient
/// have at least one annotation across all its MRIs") and persist it.
/// Returns the refreshed patient, `None` when the patient is gone.
pub fn refresh_lesional_flag(
    conn: &Connection,
    patient_id: i64,
) -> Result<Option<Patient>, DatabaseError> {
    let has_annotation: bool = conn.query_row(
        "SELECT EXISTS(
             SELECT 1 FROM annotations
             JOIN mris ON mris.id = annotations.mri_id
             WHERE mris.patient_id = ?1
         )",
        params![patient_id],
        |row| row.get(0),
    )?;

    let flag = if has_annotation { "1" } else { "0" };
    mapper::update_row(
        conn,
        "patients",
        &[("has_lesional_mri", &flag)],
        Condition::new("id", &patient_id),
        Patient::from_row,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{insert_annotation, insert_mri};
    use crate::db::sqlite::open_memory_database;
    use crate::models::AnnotationForm;

    fn patient(surname: &str) -> NewPatient {
        NewPatient {
            kkb_id: format!("K-{surname}"),
            firstname: "Test".into(),
            surname: surname.into(),
            dob: "1990-01-01".into(),
            sex: "0".into(),
            ..Default::default()
        }
    }

    #[test]
    fn insert_assigns_id_and_defaults() {
        let conn = open_memory_database().unwrap();
        let p = insert_patient(&conn, &patient("Abel")).unwrap();
        assert!(p.id > 0);
        // Unsupplied coded flags come back as their schema defaults
        assert_eq!(p.has_lesional_mri, "0");
        assert_eq!(p.is_complete, "0");
    }

    #[test]
    fn update_missing_patient_returns_none() {
        let conn = open_memory_database().unwrap();
        let ghost = Patient {
            id: 99,
            kkb_id: String::new(),
            firstname: String::new(),
            surname: "Ghost".into(),
            dob: String::new(),
            sex: "555".into(),
            has_lesional_mri: "0".into(),
            is_complete: "0".into(),
        };
        assert!(update_patient(&conn, &ghost).unwrap().is_none());
    }

    #[test]
    fn delete_counts_are_exact() {
        let conn = open_memory_database().unwrap();
        let p = insert_patient(&conn, &patient("Kurz")).unwrap();
        assert_eq!(delete_patient(&conn, p.id).unwrap(), 1);
        assert_eq!(delete_patient(&conn, p.id).unwrap(), 0);
    }

    #[test]
    fn all_patients_ordered_by_surname() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &patient("Zuse")).unwrap();
        insert_patient(&conn, &patient("Abel")).unwrap();
        insert_patient(&conn, &patient("Meitner")).unwrap();

        let names: Vec<String> = get_all_patients(&conn)
            .unwrap()
            .into_iter()
            .map(|p| p.surname)
            .collect();
        assert_eq!(names, ["Abel", "Meitner", "Zuse"]);
    }

    #[test]
    fn search_by_study_id_ordered_by_surname() {
        let conn = open_memory_database().unwrap();
        let zuse = insert_patient(&conn, &patient("Zuse")).unwrap();
        let abel = insert_patient(&conn, &patient("Abel")).unwrap();
        insert_mri(&conn, zuse.id, "S-SHARED").unwrap();
        insert_mri(&conn, abel.id, "S-SHARED").unwrap();

        let found = search_advanced(
            &conn,
            &AdvancedSearch {
                study_id: "S-SHARED".into(),
                entity_code: String::new(),
            },
        )
        .unwrap();
        let names: Vec<&str> = found.iter().map(|p| p.surname.as_str()).collect();
        assert_eq!(names, ["Abel", "Zuse"]);
    }

    #[test]
    fn search_without_match_is_empty_not_error() {
        let conn = open_memory_database().unwrap();
        let found = search_advanced(
            &conn,
            &AdvancedSearch {
                study_id: "S-404".into(),
                entity_code: String::new(),
            },
        )
        .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn search_by_entity_code() {
        let conn = open_memory_database().unwrap();
        let hit = insert_patient(&conn, &patient("Hit")).unwrap();
        let miss = insert_patient(&conn, &patient("Miss")).unwrap();
        let mri = insert_mri(&conn, hit.id, "S-1").unwrap();
        insert_mri(&conn, miss.id, "S-2").unwrap();
        insert_annotation(
            &conn,
            &AnnotationForm {
                mri_id: mri.id,
                entity_code: "FCD2B".into(),
                ..Default::default()
            },
        )
        .unwrap();

        let found = search_advanced(
            &conn,
            &AdvancedSearch {
                study_id: String::new(),
                entity_code: "FCD2B".into(),
            },
        )
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, hit.id);
    }

    #[test]
    fn empty_filters_return_nothing() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &patient("Anyone")).unwrap();
        let found = search_advanced(&conn, &AdvancedSearch::default()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn lesional_flag_follows_annotations() {
        let conn = open_memory_database().unwrap();
        let p = insert_patient(&conn, &patient("Flag")).unwrap();
        let mri = insert_mri(&conn, p.id, "S-1").unwrap();

        let refreshed = refresh_lesional_flag(&conn, p.id).unwrap().unwrap();
        assert_eq!(refreshed.has_lesional_mri, "0");

        let ann = insert_annotation(
            &conn,
            &AnnotationForm {
                mri_id: mri.id,
                entity_code: "HS".into(),
                ..Default::default()
            },
        )
        .unwrap();
        let refreshed = refresh_lesional_flag(&conn, p.id).unwrap().unwrap();
        assert_eq!(refreshed.has_lesional_mri, "1");

        crate::db::repository::delete_annotation(&conn, ann.ann_id).unwrap();
        let refreshed = refresh_lesional_flag(&conn, p.id).unwrap().unwrap();
        assert_eq!(refreshed.has_lesional_mri, "0");
    }
}
