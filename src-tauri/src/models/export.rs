use serde::{Deserialize, Serialize};

use super::meld::MeldRecord;
use super::mri::MriAnnotationRow;
use super::patient::{NewPatient, Patient};

/// Which entity groups an export run covers. Parsed from the
/// comma-separated scope string the export dialog sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportScope {
    pub patients: bool,
    pub melds: bool,
    pub mris: bool,
}

impl ExportScope {
    pub fn from_list(scopes: &str) -> Self {
        let mut scope = Self::default();
        for part in scopes.split(',') {
            match part.trim() {
                "patients" => scope.patients = true,
                "melds" => scope.melds = true,
                "mris" => scope.mris = true,
                _ => {}
            }
        }
        scope
    }

    pub fn is_empty(&self) -> bool {
        !(self.patients || self.melds || self.mris)
    }
}

/// Requested output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Export request from the frontend dialog.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub format: ExportFormat,
    /// Comma-separated list of `patients`, `melds`, `mris`.
    pub data_scope: String,
    /// Optional comma-separated entity codes; narrows the export to
    /// patients having a matching annotation.
    pub entities: Option<String>,
    /// Destination path, already chosen through the save dialog.
    pub path: String,
}

/// Snapshot of the rows an export run works from, per requested scope.
#[derive(Debug, Clone, Default)]
pub struct CollectedData {
    pub patients: Option<Vec<Patient>>,
    pub mris: Option<Vec<MriAnnotationRow>>,
    pub melds: Option<Vec<MeldExportRow>>,
}

/// MELD row joined with the demographic fields the export shape needs.
#[derive(Debug, Clone)]
pub struct MeldExportRow {
    pub meld: MeldRecord,
    pub sex: String,
    pub is_complete: String,
}

/// One case in the nested JSON export shape. Every sub-record is
/// optional; which ones are present depends on the export scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportedCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<NewPatient>,
    #[serde(
        rename = "MRIs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mris: Option<Vec<ExportedMri>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meld: Option<ExportedMeld>,
}

/// MRI in export shape: internal ids are dropped, the study id is the
/// grouping key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportedMri {
    pub study_id: String,
    #[serde(default)]
    pub annotations: Vec<ExportedAnnotation>,
}

/// Annotation in export shape — data fields only, no ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportedAnnotation {
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

/// Questionnaire in export shape. Differences to storage: a synthesized
/// human-readable `id` (not stable across export runs), the joined
/// demographic fields, and `radiology_other` renamed to
/// `radiology_report`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportedMeld {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub participant_information_complete: String,
    #[serde(default)]
    pub radiology_report: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub patient_control: String,
    #[serde(default)]
    pub radiology: String,
    #[serde(default)]
    pub field_strengths: String,
    #[serde(default)]
    pub age_at_preop_t1_3t: String,
    #[serde(default)]
    pub preop_t1_yr_3t: String,
    #[serde(default)]
    pub postop_t1_yr: String,
    #[serde(default)]
    pub preop_t1: String,
    #[serde(default)]
    pub preop_t2: String,
    #[serde(default)]
    pub preop_flair: String,
    #[serde(default)]
    pub preop_dwi: String,
    #[serde(default)]
    pub postop_t1: String,
    #[serde(default)]
    pub fields: String,
    #[serde(default)]
    pub lesion_mask: String,
    #[serde(default)]
    pub age_at_onset: String,
    #[serde(default)]
    pub gtcs: String,
    #[serde(default)]
    pub drug_resistant: String,
    #[serde(default)]
    pub aeds: String,
    #[serde(default)]
    pub mri_negative: String,
    #[serde(default)]
    pub seeg: String,
    #[serde(default)]
    pub operated: String,
    #[serde(default)]
    pub surgery_year: String,
    #[serde(default)]
    pub age_at_surgery: String,
    #[serde(default)]
    pub mri_negative_surgery: String,
    #[serde(default)]
    pub procedure: String,
    #[serde(default)]
    pub procedure_other: String,
    #[serde(default)]
    pub histology: String,
    #[serde(default)]
    pub histology_other: String,
    #[serde(default)]
    pub seizure_free: String,
    #[serde(default)]
    pub seizure_free_aura: String,
    #[serde(default)]
    pub engel_1yr: String,
    #[serde(default)]
    pub ilae_1yr: String,
    #[serde(default)]
    pub engel: String,
    #[serde(default)]
    pub ilae: String,
    #[serde(default)]
    pub follow_up: String,
    #[serde(default)]
    pub aeds_post_op: String,
}

impl ExportedMeld {
    /// Map back to the storage shape for re-import. The synthesized
    /// `id` and the joined `sex` / `participant_information_complete`
    /// are demographic/addressing info and are dropped here — they live
    /// on the patient row.
    pub fn to_storage(&self, patient_id: i64) -> MeldRecord {
        MeldRecord {
            patient_id,
            site: self.site.clone(),
            patient_control: self.patient_control.clone(),
            radiology: self.radiology.clone(),
            radiology_other: self.radiology_report.clone(),
            field_strengths: self.field_strengths.clone(),
            age_at_preop_t1_3t: self.age_at_preop_t1_3t.clone(),
            preop_t1_yr_3t: self.preop_t1_yr_3t.clone(),
            postop_t1_yr: self.postop_t1_yr.clone(),
            preop_t1: self.preop_t1.clone(),
            preop_t2: self.preop_t2.clone(),
            preop_flair: self.preop_flair.clone(),
            preop_dwi: self.preop_dwi.clone(),
            postop_t1: self.postop_t1.clone(),
            fields: self.fields.clone(),
            lesion_mask: self.lesion_mask.clone(),
            age_at_onset: self.age_at_onset.clone(),
            gtcs: self.gtcs.clone(),
            drug_resistant: self.drug_resistant.clone(),
            aeds: self.aeds.clone(),
            mri_negative: self.mri_negative.clone(),
            seeg: self.seeg.clone(),
            operated: self.operated.clone(),
            surgery_year: self.surgery_year.clone(),
            age_at_surgery: self.age_at_surgery.clone(),
            mri_negative_surgery: self.mri_negative_surgery.clone(),
            procedure: self.procedure.clone(),
            procedure_other: self.procedure_other.clone(),
            histology: self.histology.clone(),
            histology_other: self.histology_other.clone(),
            seizure_free: self.seizure_free.clone(),
            seizure_free_aura: self.seizure_free_aura.clone(),
            engel_1yr: self.engel_1yr.clone(),
            ilae_1yr: self.ilae_1yr.clone(),
            engel: self.engel.clone(),
            ilae: self.ilae.clone(),
            follow_up: self.follow_up.clone(),
            aeds_post_op: self.aeds_post_op.clone(),
        }
    }
}

/// Outcome of an import run. Partial success is normal: entries that
/// fail or carry no patient payload are skipped, not fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub total: usize,
    pub imported: usize,
}
