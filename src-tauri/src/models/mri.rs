use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// One MRI study belonging to a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mri {
    pub id: i64,
    pub patient_id: i64,
    pub study_id: String,
}

impl Mri {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            patient_id: row.get("patient_id")?,
            study_id: row.get("study_id")?,
        })
    }
}

/// One lesion annotation on an MRI. The clinical flags are tri-state:
/// '' = unknown, '0' = no, '1' = yes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub ann_id: i64,
    pub mri_id: i64,
    pub arrow_num: String,
    pub entity_name: String,
    pub entity_code: String,
    pub epileptogenic: String,
    pub therapy: String,
    pub follow_up: String,
}

impl Annotation {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            ann_id: row.get("ann_id")?,
            mri_id: row.get("mri_id")?,
            arrow_num: row.get("arrow_num")?,
            entity_name: row.get("entity_name")?,
            entity_code: row.get("entity_code")?,
            epileptogenic: row.get("epileptogenic")?,
            therapy: row.get("therapy")?,
            follow_up: row.get("follow_up")?,
        })
    }
}

/// Annotation payload from the form. Identifier fields address the row;
/// only the data fields are ever written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationForm {
    #[serde(default)]
    pub ann_id: i64,
    pub mri_id: i64,
    #[serde(default)]
    pub arrow_num: String,
    #[serde(default)]
    pub entity_name: String,
    #[serde(default)]
    pub entity_code: String,
    #[serde(default)]
    pub epileptogenic: String,
    #[serde(default)]
    pub therapy: String,
    #[serde(default)]
    pub follow_up: String,
}

/// One row of the MRIs LEFT JOIN annotations read. The annotation side
/// is `None` for studies without any annotation.
#[derive(Debug, Clone)]
pub struct MriAnnotationRow {
    pub mri: Mri,
    pub annotation: Option<Annotation>,
}

impl MriAnnotationRow {
    /// Maps a joined row aliased as
    /// `mris.*, annotations.ann_id, annotations.mri_id, ...`.
    /// `ann_id` is NULL exactly when the MRI has no annotations.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let mri = Mri {
            id: row.get("id")?,
            patient_id: row.get("patient_id")?,
            study_id: row.get("study_id")?,
        };
        let annotation = match row.get::<_, Option<i64>>("ann_id")? {
            Some(ann_id) => Some(Annotation {
                ann_id,
                mri_id: row.get("mri_id")?,
                arrow_num: row.get("arrow_num")?,
                entity_name: row.get("entity_name")?,
                entity_code: row.get("entity_code")?,
                epileptogenic: row.get("epileptogenic")?,
                therapy: row.get("therapy")?,
                follow_up: row.get("follow_up")?,
            }),
            None => None,
        };
        Ok(Self { mri, annotation })
    }
}
