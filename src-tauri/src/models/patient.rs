use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// One patient case row. Coded fields keep the questionnaire value
/// domains as stored: `sex` is '0'/'1'/'555', `has_lesional_mri` is
/// '0'/'1', `is_complete` is '0'/'2'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub kkb_id: String,
    pub firstname: String,
    pub surname: String,
    pub dob: String,
    pub sex: String,
    pub has_lesional_mri: String,
    pub is_complete: String,
}

/// Patient fields for case creation — everything except the
/// database-assigned id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPatient {
    #[serde(default)]
    pub kkb_id: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub has_lesional_mri: String,
    #[serde(default)]
    pub is_complete: String,
}

impl Patient {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            kkb_id: row.get("kkb_id")?,
            firstname: row.get("firstname")?,
            surname: row.get("surname")?,
            dob: row.get("dob")?,
            sex: row.get("sex")?,
            has_lesional_mri: row.get("has_lesional_mri")?,
            is_complete: row.get("is_complete")?,
        })
    }

    /// The export shape of a patient: its stored fields without the
    /// internal id.
    pub fn without_id(&self) -> NewPatient {
        NewPatient {
            kkb_id: self.kkb_id.clone(),
            firstname: self.firstname.clone(),
            surname: self.surname.clone(),
            dob: self.dob.clone(),
            sex: self.sex.clone(),
            has_lesional_mri: self.has_lesional_mri.clone(),
            is_complete: self.is_complete.clone(),
        }
    }
}
