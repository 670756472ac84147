use rusqlite::{Row, ToSql};
use serde::{Deserialize, Serialize};

/// MELD questionnaire row — one per patient, keyed by `patient_id`.
/// All clinical fields are free-form or coded text straight from the
/// form; empty string means "not filled in".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeldRecord {
    pub patient_id: i64,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub patient_control: String,
    #[serde(default)]
    pub radiology: String,
    #[serde(default)]
    pub radiology_other: String,
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

impl MeldRecord {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            patient_id: row.get("patient_id")?,
            site: row.get("site")?,
            patient_control: row.get("patient_control")?,
            radiology: row.get("radiology")?,
            radiology_other: row.get("radiology_other")?,
            field_strengths: row.get("field_strengths")?,
            age_at_preop_t1_3t: row.get("age_at_preop_t1_3t")?,
            preop_t1_yr_3t: row.get("preop_t1_yr_3t")?,
            postop_t1_yr: row.get("postop_t1_yr")?,
            preop_t1: row.get("preop_t1")?,
            preop_t2: row.get("preop_t2")?,
            preop_flair: row.get("preop_flair")?,
            preop_dwi: row.get("preop_dwi")?,
            postop_t1: row.get("postop_t1")?,
            fields: row.get("fields")?,
            lesion_mask: row.get("lesion_mask")?,
            age_at_onset: row.get("age_at_onset")?,
            gtcs: row.get("gtcs")?,
            drug_resistant: row.get("drug_resistant")?,
            aeds: row.get("aeds")?,
            mri_negative: row.get("mri_negative")?,
            seeg: row.get("seeg")?,
            operated: row.get("operated")?,
            surgery_year: row.get("surgery_year")?,
            age_at_surgery: row.get("age_at_surgery")?,
            mri_negative_surgery: row.get("mri_negative_surgery")?,
            procedure: row.get("procedure")?,
            procedure_other: row.get("procedure_other")?,
            histology: row.get("histology")?,
            histology_other: row.get("histology_other")?,
            seizure_free: row.get("seizure_free")?,
            seizure_free_aura: row.get("seizure_free_aura")?,
            engel_1yr: row.get("engel_1yr")?,
            ilae_1yr: row.get("ilae_1yr")?,
            engel: row.get("engel")?,
            ilae: row.get("ilae")?,
            follow_up: row.get("follow_up")?,
            aeds_post_op: row.get("aeds_post_op")?,
        })
    }

    /// Full column/value list for inserting this record (import path).
    pub fn insert_fields(&self) -> Vec<(&'static str, &dyn ToSql)> {
        vec![
            ("patient_id", &self.patient_id),
            ("site", &self.site),
            ("patient_control", &self.patient_control),
            ("radiology", &self.radiology),
            ("radiology_other", &self.radiology_other),
            ("field_strengths", &self.field_strengths),
            ("age_at_preop_t1_3t", &self.age_at_preop_t1_3t),
            ("preop_t1_yr_3t", &self.preop_t1_yr_3t),
            ("postop_t1_yr", &self.postop_t1_yr),
            ("preop_t1", &self.preop_t1),
            ("preop_t2", &self.preop_t2),
            ("preop_flair", &self.preop_flair),
            ("preop_dwi", &self.preop_dwi),
            ("postop_t1", &self.postop_t1),
            ("fields", &self.fields),
            ("lesion_mask", &self.lesion_mask),
            ("age_at_onset", &self.age_at_onset),
            ("gtcs", &self.gtcs),
            ("drug_resistant", &self.drug_resistant),
            ("aeds", &self.aeds),
            ("mri_negative", &self.mri_negative),
            ("seeg", &self.seeg),
            ("operated", &self.operated),
            ("surgery_year", &self.surgery_year),
            ("age_at_surgery", &self.age_at_surgery),
            ("mri_negative_surgery", &self.mri_negative_surgery),
            ("procedure", &self.procedure),
            ("procedure_other", &self.procedure_other),
            ("histology", &self.histology),
            ("histology_other", &self.histology_other),
            ("seizure_free", &self.seizure_free),
            ("seizure_free_aura", &self.seizure_free_aura),
            ("engel_1yr", &self.engel_1yr),
            ("ilae_1yr", &self.ilae_1yr),
            ("engel", &self.engel),
            ("ilae", &self.ilae),
            ("follow_up", &self.follow_up),
            ("aeds_post_op", &self.aeds_post_op),
        ]
    }
}

/// Partial questionnaire update: only fields present in the payload are
/// written. The form sends exactly the controls the user touched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeldUpdate {
    pub patient_id: i64,
    pub site: Option<String>,
    pub patient_control: Option<String>,
    pub radiology: Option<String>,
    pub radiology_other: Option<String>,
    pub field_strengths: Option<String>,
    pub age_at_preop_t1_3t: Option<String>,
    pub preop_t1_yr_3t: Option<String>,
    pub postop_t1_yr: Option<String>,
    pub preop_t1: Option<String>,
    pub preop_t2: Option<String>,
    pub preop_flair: Option<String>,
    pub preop_dwi: Option<String>,
    pub postop_t1: Option<String>,
    pub fields: Option<String>,
    pub lesion_mask: Option<String>,
    pub age_at_onset: Option<String>,
    pub gtcs: Option<String>,
    pub drug_resistant: Option<String>,
    pub aeds: Option<String>,
    pub mri_negative: Option<String>,
    pub seeg: Option<String>,
    pub operated: Option<String>,
    pub surgery_year: Option<String>,
    pub age_at_surgery: Option<String>,
    pub mri_negative_surgery: Option<String>,
    pub procedure: Option<String>,
    pub procedure_other: Option<String>,
    pub histology: Option<String>,
    pub histology_other: Option<String>,
    pub seizure_free: Option<String>,
    pub seizure_free_aura: Option<String>,
    pub engel_1yr: Option<String>,
    pub ilae_1yr: Option<String>,
    pub engel: Option<String>,
    pub ilae: Option<String>,
    pub follow_up: Option<String>,
    pub aeds_post_op: Option<String>,
}

impl MeldUpdate {
    /// Column/value list of the supplied fields only.
    pub fn set_fields(&self) -> Vec<(&'static str, &dyn ToSql)> {
        let mut out: Vec<(&'static str, &dyn ToSql)> = Vec::new();
        macro_rules! collect_set {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = &self.$field {
                        out.push((stringify!($field), value));
                    }
                )*
            };
        }
        collect_set!(
            site,
            patient_control,
            radiology,
            radiology_other,
            field_strengths,
            age_at_preop_t1_3t,
            preop_t1_yr_3t,
            postop_t1_yr,
            preop_t1,
            preop_t2,
            preop_flair,
            preop_dwi,
            postop_t1,
            fields,
            lesion_mask,
            age_at_onset,
            gtcs,
            drug_resistant,
            aeds,
            mri_negative,
            seeg,
            operated,
            surgery_year,
            age_at_surgery,
            mri_negative_surgery,
            procedure,
            procedure_other,
            histology,
            histology_other,
            seizure_free,
            seizure_free_aura,
            engel_1yr,
            ilae_1yr,
            engel,
            ilae,
            follow_up,
            aeds_post_op,
        );
        out
    }
}
