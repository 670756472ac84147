//! Export shaper: collects a snapshot of the requested scope and shapes
//! it into either the flat per-row form (spreadsheets) or the nested
//! per-case form (JSON).

pub mod collect;
pub mod flat;
pub mod nested;
pub mod writer;

pub use collect::*;
pub use flat::*;
pub use nested::*;
pub use writer::*;

use thiserror::Error;

use crate::models::{ExportedMeld, MeldExportRow};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX write failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Shape one questionnaire row for export: rename `radiology_other` to
/// `radiology_report`, pull in the joined demographics, and synthesize
/// the human-readable MELD id.
pub fn format_meld(row: &MeldExportRow, sequence: usize) -> ExportedMeld {
    let meld = &row.meld;
    ExportedMeld {
        id: synthesize_meld_id(&meld.site, &meld.patient_control, sequence),
        sex: row.sex.clone(),
        participant_information_complete: row.is_complete.clone(),
        radiology_report: meld.radiology_other.clone(),
        site: meld.site.clone(),
        patient_control: meld.patient_control.clone(),
        radiology: meld.radiology.clone(),
        field_strengths: meld.field_strengths.clone(),
        age_at_preop_t1_3t: meld.age_at_preop_t1_3t.clone(),
        preop_t1_yr_3t: meld.preop_t1_yr_3t.clone(),
        postop_t1_yr: meld.postop_t1_yr.clone(),
        preop_t1: meld.preop_t1.clone(),
        preop_t2: meld.preop_t2.clone(),
        preop_flair: meld.preop_flair.clone(),
        preop_dwi: meld.preop_dwi.clone(),
        postop_t1: meld.postop_t1.clone(),
        fields: meld.fields.clone(),
        lesion_mask: meld.lesion_mask.clone(),
        age_at_onset: meld.age_at_onset.clone(),
        gtcs: meld.gtcs.clone(),
        drug_resistant: meld.drug_resistant.clone(),
        aeds: meld.aeds.clone(),
        mri_negative: meld.mri_negative.clone(),
        seeg: meld.seeg.clone(),
        operated: meld.operated.clone(),
        surgery_year: meld.surgery_year.clone(),
        age_at_surgery: meld.age_at_surgery.clone(),
        mri_negative_surgery: meld.mri_negative_surgery.clone(),
        procedure: meld.procedure.clone(),
        procedure_other: meld.procedure_other.clone(),
        histology: meld.histology.clone(),
        histology_other: meld.histology_other.clone(),
        seizure_free: meld.seizure_free.clone(),
        seizure_free_aura: meld.seizure_free_aura.clone(),
        engel_1yr: meld.engel_1yr.clone(),
        ilae_1yr: meld.ilae_1yr.clone(),
        engel: meld.engel.clone(),
        ilae: meld.ilae.clone(),
        follow_up: meld.follow_up.clone(),
        aeds_post_op: meld.aeds_post_op.clone(),
    }
}

/// `MELD_<site>_<P|C>_<4-digit sequence>`. The sequence is the 1-based
/// position within the current export batch, so the id is regenerated
/// per run and must never be treated as a stable key.
pub fn synthesize_meld_id(site: &str, patient_control: &str, sequence: usize) -> String {
    let kind = if patient_control == "1" { 'P' } else { 'C' };
    format!("MELD_{site}_{kind}_{sequence:04}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeldRecord;

    #[test]
    fn meld_id_is_padded_and_typed() {
        assert_eq!(synthesize_meld_id("BON", "1", 3), "MELD_BON_P_0003");
        assert_eq!(synthesize_meld_id("BON", "2", 41), "MELD_BON_C_0041");
        // Sequence numbers keep growing past the padding width
        assert_eq!(synthesize_meld_id("BON", "1", 12345), "MELD_BON_P_12345");
    }

    #[test]
    fn format_meld_renames_and_enriches() {
        let row = MeldExportRow {
            meld: MeldRecord {
                patient_id: 9,
                site: "LON".into(),
                patient_control: "1".into(),
                radiology_other: "left temporal HS".into(),
                engel: "1".into(),
                ..Default::default()
            },
            sex: "0".into(),
            is_complete: "2".into(),
        };

        let exported = format_meld(&row, 1);
        assert_eq!(exported.id, "MELD_LON_P_0001");
        assert_eq!(exported.radiology_report, "left temporal HS");
        assert_eq!(exported.sex, "0");
        assert_eq!(exported.participant_information_complete, "2");
        assert_eq!(exported.engel, "1");
    }
}
