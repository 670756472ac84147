use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::db::repository::{
    case_mri_rows, get_meld, get_patient, insert_empty_meld, insert_patient,
};
use crate::db::DatabaseError;
use crate::models::{Annotation, MeldRecord, Mri, NewPatient, Patient};

/// Everything the form window needs for one case: the patient, its
/// questionnaire, and deduplicated id-keyed maps of MRIs and their
/// annotations (the form filters annotations by parent MRI id).
#[derive(Debug, Clone, Serialize)]
pub struct CaseBundle {
    pub patient: Patient,
    #[serde(rename = "MRIs")]
    pub mris: BTreeMap<i64, Mri>,
    pub annotations: BTreeMap<i64, Annotation>,
    pub meld: MeldRecord,
}

/// Create a new case: the patient row and its empty MELD row commit
/// together or not at all — a patient without a questionnaire (or the
/// reverse) is an invalid state.
pub fn create_case(conn: &Connection, patient: &NewPatient) -> Result<Patient, DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    let created = insert_patient(&tx, patient)?;
    insert_empty_meld(&tx, created.id)?;
    tx.commit()?;

    tracing::info!(patient_id = created.id, "Case created");
    Ok(created)
}

/// Assemble the full case for the form window. The MRI/annotation left
/// join duplicates each MRI once per annotation (or yields one row with
/// a NULL annotation side), so the rows are folded back into two maps.
pub fn get_case(conn: &Connection, patient_id: i64) -> Result<CaseBundle, DatabaseError> {
    let patient = get_patient(conn, patient_id)?.ok_or_else(|| {
        DatabaseError::ConstraintViolation(format!("no patient with id {patient_id}"))
    })?;
    let meld = get_meld(conn, patient_id)?.ok_or_else(|| {
        DatabaseError::ConstraintViolation(format!("patient {patient_id} has no MELD row"))
    })?;

    let mut mris: BTreeMap<i64, Mri> = BTreeMap::new();
    let mut annotations: BTreeMap<i64, Annotation> = BTreeMap::new();

    for row in case_mri_rows(conn, patient_id)? {
        mris.entry(row.mri.id).or_insert(row.mri);
        if let Some(annotation) = row.annotation {
            annotations.insert(annotation.ann_id, annotation);
        }
    }

    Ok(CaseBundle {
        patient,
        mris,
        annotations,
        meld,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{delete_patient, insert_annotation, insert_mri};
    use crate::db::sqlite::open_memory_database;
    use crate::models::AnnotationForm;

    fn new_patient(surname: &str) -> NewPatient {
        NewPatient {
            surname: surname.into(),
            ..Default::default()
        }
    }

    #[test]
    fn create_then_get_yields_default_case() {
        let conn = open_memory_database().unwrap();
        let patient = create_case(&conn, &new_patient("Fresh")).unwrap();
        let bundle = get_case(&conn, patient.id).unwrap();

        assert_eq!(bundle.meld.patient_id, patient.id);
        assert_eq!(bundle.meld, MeldRecord {
            patient_id: patient.id,
            ..Default::default()
        });
        assert!(bundle.mris.is_empty());
        assert!(bundle.annotations.is_empty());
    }

    #[test]
    fn create_case_is_atomic() {
        let conn = open_memory_database().unwrap();
        let patient = create_case(&conn, &new_patient("First")).unwrap();

        // Force the MELD insert to fail by pre-seeding a questionnaire
        // row for the id the next patient will get. FK enforcement is
        // paused for the orphan setup row only.
        conn.execute_batch("PRAGMA foreign_keys=OFF").unwrap();
        conn.execute(
            "INSERT INTO meld (patient_id) VALUES (?1)",
            [patient.id + 1],
        )
        .unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON").unwrap();

        let result = create_case(&conn, &new_patient("Second"));
        assert!(result.is_err());

        // The patient insert rolled back with the failed MELD insert.
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM patients WHERE surname = 'Second'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn reassembly_never_duplicates_parent_mris() {
        let conn = open_memory_database().unwrap();
        let patient = create_case(&conn, &new_patient("Joined")).unwrap();

        let busy = insert_mri(&conn, patient.id, "S-BUSY").unwrap();
        let quiet = insert_mri(&conn, patient.id, "S-QUIET").unwrap();
        let mut ann_ids = Vec::new();
        for code in ["FCD2B", "HS", "CAV"] {
            let ann = insert_annotation(
                &conn,
                &AnnotationForm {
                    mri_id: busy.id,
                    entity_code: code.into(),
                    ..Default::default()
                },
            )
            .unwrap();
            ann_ids.push(ann.ann_id);
        }

        let bundle = get_case(&conn, patient.id).unwrap();
        assert_eq!(bundle.mris.len(), 2);
        assert!(bundle.mris.contains_key(&busy.id));
        assert!(bundle.mris.contains_key(&quiet.id));

        assert_eq!(bundle.annotations.len(), 3);
        for ann_id in ann_ids {
            assert_eq!(bundle.annotations[&ann_id].mri_id, busy.id);
        }
    }

    #[test]
    fn delete_case_cascades() {
        let conn = open_memory_database().unwrap();
        let patient = create_case(&conn, &new_patient("Gone")).unwrap();
        let mri = insert_mri(&conn, patient.id, "S-1").unwrap();
        insert_annotation(
            &conn,
            &AnnotationForm {
                mri_id: mri.id,
                entity_code: "HS".into(),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(delete_patient(&conn, patient.id).unwrap(), 1);
        for table in ["meld", "mris", "annotations"] {
            let count: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })
                .unwrap();
            assert_eq!(count, 0, "{table} survived the cascade");
        }
    }
}
