use std::collections::BTreeMap;

use crate::export::format_meld;
use crate::models::{CollectedData, ExportedMeld, MriAnnotationRow, Patient};

/// One spreadsheet row: the union of patient, MELD-export and
/// MRI/annotation columns. Merge order is patient, then MELD, then
/// annotation — later merges win on the shared columns (`sex`,
/// `follow_up`). Empty string means "not part of this export scope".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRow {
    // Patient
    pub kkb_id: String,
    pub firstname: String,
    pub surname: String,
    pub dob: String,
    pub sex: String,
    pub has_lesional_mri: String,
    pub is_complete: String,
    // MELD (export shape)
    pub id: String,
    pub radiology_report: String,
    pub participant_information_complete: String,
    pub site: String,
    pub patient_control: String,
    pub radiology: String,
    pub field_strengths: String,
    pub age_at_preop_t1_3t: String,
    pub preop_t1_yr_3t: String,
    pub postop_t1_yr: String,
    pub preop_t1: String,
    pub preop_t2: String,
    pub preop_flair: String,
    pub preop_dwi: String,
    pub postop_t1: String,
    pub fields: String,
    pub lesion_mask: String,
    pub age_at_onset: String,
    pub gtcs: String,
    pub drug_resistant: String,
    pub aeds: String,
    pub mri_negative: String,
    pub seeg: String,
    pub operated: String,
    pub surgery_year: String,
    pub age_at_surgery: String,
    pub mri_negative_surgery: String,
    pub procedure: String,
    pub procedure_other: String,
    pub histology: String,
    pub histology_other: String,
    pub seizure_free: String,
    pub seizure_free_aura: String,
    pub engel_1yr: String,
    pub ilae_1yr: String,
    pub engel: String,
    pub ilae: String,
    pub follow_up: String,
    pub aeds_post_op: String,
    // MRI / annotation
    pub study_id: String,
    pub arrow_num: String,
    pub entity_name: String,
    pub entity_code: String,
    pub epileptogenic: String,
    pub therapy: String,
}

impl FlatRow {
    /// Header row, in struct order.
    pub const COLUMNS: [&'static str; 52] = [
        "kkb_id",
        "firstname",
        "surname",
        "dob",
        "sex",
        "has_lesional_mri",
        "is_complete",
        "id",
        "radiology_report",
        "participant_information_complete",
        "site",
        "patient_control",
        "radiology",
        "field_strengths",
        "age_at_preop_t1_3t",
        "preop_t1_yr_3t",
        "postop_t1_yr",
        "preop_t1",
        "preop_t2",
        "preop_flair",
        "preop_dwi",
        "postop_t1",
        "fields",
        "lesion_mask",
        "age_at_onset",
        "gtcs",
        "drug_resistant",
        "aeds",
        "mri_negative",
        "seeg",
        "operated",
        "surgery_year",
        "age_at_surgery",
        "mri_negative_surgery",
        "procedure",
        "procedure_other",
        "histology",
        "histology_other",
        "seizure_free",
        "seizure_free_aura",
        "engel_1yr",
        "ilae_1yr",
        "engel",
        "ilae",
        "follow_up",
        "aeds_post_op",
        "study_id",
        "arrow_num",
        "entity_name",
        "entity_code",
        "epileptogenic",
        "therapy",
    ];

    /// Cell values in `COLUMNS` order.
    pub fn values(&self) -> [&str; 52] {
        [
            &self.kkb_id,
            &self.firstname,
            &self.surname,
            &self.dob,
            &self.sex,
            &self.has_lesional_mri,
            &self.is_complete,
            &self.id,
            &self.radiology_report,
            &self.participant_information_complete,
            &self.site,
            &self.patient_control,
            &self.radiology,
            &self.field_strengths,
            &self.age_at_preop_t1_3t,
            &self.preop_t1_yr_3t,
            &self.postop_t1_yr,
            &self.preop_t1,
            &self.preop_t2,
            &self.preop_flair,
            &self.preop_dwi,
            &self.postop_t1,
            &self.fields,
            &self.lesion_mask,
            &self.age_at_onset,
            &self.gtcs,
            &self.drug_resistant,
            &self.aeds,
            &self.mri_negative,
            &self.seeg,
            &self.operated,
            &self.surgery_year,
            &self.age_at_surgery,
            &self.mri_negative_surgery,
            &self.procedure,
            &self.procedure_other,
            &self.histology,
            &self.histology_other,
            &self.seizure_free,
            &self.seizure_free_aura,
            &self.engel_1yr,
            &self.ilae_1yr,
            &self.engel,
            &self.ilae,
            &self.follow_up,
            &self.aeds_post_op,
            &self.study_id,
            &self.arrow_num,
            &self.entity_name,
            &self.entity_code,
            &self.epileptogenic,
            &self.therapy,
        ]
    }

    fn apply_patient(&mut self, patient: &Patient) {
        self.kkb_id = patient.kkb_id.clone();
        self.firstname = patient.firstname.clone();
        self.surname = patient.surname.clone();
        self.dob = patient.dob.clone();
        self.sex = patient.sex.clone();
        self.has_lesional_mri = patient.has_lesional_mri.clone();
        self.is_complete = patient.is_complete.clone();
    }

    fn apply_meld(&mut self, meld: &ExportedMeld) {
        self.id = meld.id.clone();
        self.sex = meld.sex.clone();
        self.participant_information_complete =
            meld.participant_information_complete.clone();
        self.radiology_report = meld.radiology_report.clone();
        self.site = meld.site.clone();
        self.patient_control = meld.patient_control.clone();
        self.radiology = meld.radiology.clone();
        self.field_strengths = meld.field_strengths.clone();
        self.age_at_preop_t1_3t = meld.age_at_preop_t1_3t.clone();
        self.preop_t1_yr_3t = meld.preop_t1_yr_3t.clone();
        self.postop_t1_yr = meld.postop_t1_yr.clone();
        self.preop_t1 = meld.preop_t1.clone();
        self.preop_t2 = meld.preop_t2.clone();
        self.preop_flair = meld.preop_flair.clone();
        self.preop_dwi = meld.preop_dwi.clone();
        self.postop_t1 = meld.postop_t1.clone();
        self.fields = meld.fields.clone();
        self.lesion_mask = meld.lesion_mask.clone();
        self.age_at_onset = meld.age_at_onset.clone();
        self.gtcs = meld.gtcs.clone();
        self.drug_resistant = meld.drug_resistant.clone();
        self.aeds = meld.aeds.clone();
        self.mri_negative = meld.mri_negative.clone();
        self.seeg = meld.seeg.clone();
        self.operated = meld.operated.clone();
        self.surgery_year = meld.surgery_year.clone();
        self.age_at_surgery = meld.age_at_surgery.clone();
        self.mri_negative_surgery = meld.mri_negative_surgery.clone();
        self.procedure = meld.procedure.clone();
        self.procedure_other = meld.procedure_other.clone();
        self.histology = meld.histology.clone();
        self.histology_other = meld.histology_other.clone();
        self.seizure_free = meld.seizure_free.clone();
        self.seizure_free_aura = meld.seizure_free_aura.clone();
        self.engel_1yr = meld.engel_1yr.clone();
        self.ilae_1yr = meld.ilae_1yr.clone();
        self.engel = meld.engel.clone();
        self.ilae = meld.ilae.clone();
        self.follow_up = meld.follow_up.clone();
        self.aeds_post_op = meld.aeds_post_op.clone();
    }

    fn apply_mri_row(&mut self, row: &MriAnnotationRow) {
        self.study_id = row.mri.study_id.clone();
        if let Some(annotation) = &row.annotation {
            self.arrow_num = annotation.arrow_num.clone();
            self.entity_name = annotation.entity_name.clone();
            self.entity_code = annotation.entity_code.clone();
            self.epileptogenic = annotation.epileptogenic.clone();
            self.therapy = annotation.therapy.clone();
            // Shared column: the annotation's flag wins over the MELD
            // outcome field of the same name.
            self.follow_up = annotation.follow_up.clone();
        }
    }
}

/// Shape the snapshot into spreadsheet rows. Without the `mris` scope
/// the result is one row per patient; with it, one row per
/// MRI-annotation join row, each carrying its patient's base fields.
pub fn flat_rows(data: &CollectedData) -> Vec<FlatRow> {
    let mut base: BTreeMap<i64, FlatRow> = BTreeMap::new();

    if let Some(patients) = &data.patients {
        for patient in patients {
            base.entry(patient.id).or_default().apply_patient(patient);
        }
    }

    if let Some(melds) = &data.melds {
        for (index, row) in melds.iter().enumerate() {
            base.entry(row.meld.patient_id)
                .or_default()
                .apply_meld(&format_meld(row, index + 1));
        }
    }

    if let Some(rows) = &data.mris {
        let mut expanded = Vec::with_capacity(rows.len());
        for row in rows {
            let mut flat = base
                .get(&row.mri.patient_id)
                .cloned()
                .unwrap_or_default();
            flat.apply_mri_row(row);
            expanded.push(flat);
        }
        if !expanded.is_empty() {
            return expanded;
        }
    }

    base.into_values().collect()
}
