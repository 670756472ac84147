use std::collections::BTreeMap;

use crate::export::format_meld;
use crate::models::{
    Annotation, CollectedData, ExportedAnnotation, ExportedCase, ExportedMri,
};

/// Shape the snapshot into one record per patient. Annotations group
/// under their parent MRI by study id — internal MRI ids do not leave
/// the database, so the study id is the only grouping key the export
/// carries.
pub fn nested_cases(data: &CollectedData) -> Vec<ExportedCase> {
    let mut cases: BTreeMap<i64, ExportedCase> = BTreeMap::new();

    if let Some(patients) = &data.patients {
        for patient in patients {
            cases.entry(patient.id).or_default().patient = Some(patient.without_id());
        }
    }

    if let Some(rows) = &data.mris {
        for row in rows {
            let entry = cases.entry(row.mri.patient_id).or_default();
            let mris = entry.mris.get_or_insert_with(Vec::new);

            let mri_entry = match mris
                .iter()
                .position(|m| m.study_id == row.mri.study_id)
            {
                Some(pos) => &mut mris[pos],
                None => {
                    mris.push(ExportedMri {
                        study_id: row.mri.study_id.clone(),
                        annotations: Vec::new(),
                    });
                    mris.last_mut().expect("just pushed")
                }
            };

            if let Some(annotation) = &row.annotation {
                mri_entry.annotations.push(strip_annotation(annotation));
            }
        }
    }

    if let Some(melds) = &data.melds {
        for (index, row) in melds.iter().enumerate() {
            cases.entry(row.meld.patient_id).or_default().meld =
                Some(format_meld(row, index + 1));
        }
    }

    cases.into_values().collect()
}

fn strip_annotation(annotation: &Annotation) -> ExportedAnnotation {
    ExportedAnnotation {
        arrow_num: annotation.arrow_num.clone(),
        entity_name: annotation.entity_name.clone(),
        entity_code: annotation.entity_code.clone(),
        epileptogenic: annotation.epileptogenic.clone(),
        therapy: annotation.therapy.clone(),
        follow_up: annotation.follow_up.clone(),
    }
}
