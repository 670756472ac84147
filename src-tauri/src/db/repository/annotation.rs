use rusqlite::Connection;

use crate::db::mapper::{self, Condition};
use crate::db::DatabaseError;
use crate::models::{Annotation, AnnotationForm};

pub fn insert_annotation(
    conn: &Connection,
    annotation: &AnnotationForm,
) -> Result<Annotation, DatabaseError> {
    mapper::insert_row(
        conn,
        "annotations",
        &[
            ("mri_id", &annotation.mri_id),
            ("arrow_num", &annotation.arrow_num),
            ("entity_name", &annotation.entity_name),
            ("entity_code", &annotation.entity_code),
            ("epileptogenic", &annotation.epileptogenic),
            ("therapy", &annotation.therapy),
            ("follow_up", &annotation.follow_up),
        ],
        Annotation::from_row,
    )
}

/// Update keyed by `ann_id`. The identifier fields of the payload are
/// addressing info only — neither `ann_id` nor `mri_id` is written, so
/// an annotation can never move to another study through an edit.
pub fn update_annotation(
    conn: &Connection,
    annotation: &AnnotationForm,
) -> Result<Option<Annotation>, DatabaseError> {
    mapper::update_row(
        conn,
        "annotations",
        &[
            ("arrow_num", &annotation.arrow_num),
            ("entity_name", &annotation.entity_name),
            ("entity_code", &annotation.entity_code),
            ("epileptogenic", &annotation.epileptogenic),
            ("therapy", &annotation.therapy),
            ("follow_up", &annotation.follow_up),
        ],
        Condition::new("ann_id", &annotation.ann_id),
        Annotation::from_row,
    )
}

pub fn delete_annotation(conn: &Connection, ann_id: i64) -> Result<usize, DatabaseError> {
    mapper::delete_rows(conn, "annotations", Condition::new("ann_id", &ann_id))
}

/// Patient owning the annotation's study, resolved before a delete so
/// the lesional flag can be refreshed afterwards.
pub fn annotation_patient_id(
    conn: &Connection,
    ann_id: i64,
) -> Result<Option<i64>, DatabaseError> {
    match conn.query_row(
        "SELECT mris.patient_id FROM annotations
         JOIN mris ON mris.id = annotations.mri_id
         WHERE annotations.ann_id = ?1",
        [ann_id],
        |row| row.get(0),
    ) {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{insert_mri, insert_patient};
    use crate::db::sqlite::open_memory_database;
    use crate::models::NewPatient;

    fn seeded_mri(conn: &Connection) -> i64 {
        let pid = insert_patient(
            conn,
            &NewPatient {
                surname: "Ann".into(),
                ..Default::default()
            },
        )
        .unwrap()
        .id;
        insert_mri(conn, pid, "S-1").unwrap().id
    }

    #[test]
    fn insert_returns_full_annotation() {
        let conn = open_memory_database().unwrap();
        let mri_id = seeded_mri(&conn);
        let ann = insert_annotation(
            &conn,
            &AnnotationForm {
                mri_id,
                arrow_num: "2".into(),
                entity_name: "Hippocampal sclerosis".into(),
                entity_code: "HS".into(),
                epileptogenic: "1".into(),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(ann.ann_id > 0);
        assert_eq!(ann.entity_code, "HS");
        // Unfilled tri-state flags stay "unknown"
        assert_eq!(ann.therapy, "");
    }

    #[test]
    fn update_does_not_move_annotation_between_mris() {
        let conn = open_memory_database().unwrap();
        let first = seeded_mri(&conn);
        let ann = insert_annotation(
            &conn,
            &AnnotationForm {
                mri_id: first,
                entity_code: "HS".into(),
                ..Default::default()
            },
        )
        .unwrap();

        // Payload claims a different parent; the write must ignore it.
        let updated = update_annotation(
            &conn,
            &AnnotationForm {
                ann_id: ann.ann_id,
                mri_id: first + 1,
                entity_code: "FCD2B".into(),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.mri_id, first);
        assert_eq!(updated.entity_code, "FCD2B");
    }

    #[test]
    fn update_missing_annotation_returns_none() {
        let conn = open_memory_database().unwrap();
        seeded_mri(&conn);
        let missing = update_annotation(
            &conn,
            &AnnotationForm {
                ann_id: 404,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn annotation_requires_existing_mri() {
        let conn = open_memory_database().unwrap();
        let result = insert_annotation(
            &conn,
            &AnnotationForm {
                mri_id: 404,
                ..Default::default()
            },
        );
        assert!(matches!(
            result,
            Err(DatabaseError::ConstraintViolation(_))
        ));
    }
}
