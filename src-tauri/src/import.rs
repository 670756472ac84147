//! Import reconciler: reads a nested JSON export back into the
//! database. Entries import independently, each inside its own
//! transaction, so one malformed case never takes down the batch.

use std::fs;
use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

use crate::db::repository::{
    insert_annotation, insert_empty_meld, insert_meld, insert_mri, insert_patient,
    refresh_lesional_flag,
};
use crate::db::DatabaseError;
use crate::models::{AnnotationForm, ExportedCase, ImportReport};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("could not read import file: {0}")]
    Io(#[from] std::io::Error),

    #[error("import file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Parse a nested-export JSON file and import every case it contains.
pub fn import_cases_file(conn: &Connection, path: &Path) -> Result<ImportReport, ImportError> {
    let text = fs::read_to_string(path)?;
    let cases: Vec<ExportedCase> = serde_json::from_str(&text)?;
    Ok(import_cases(conn, &cases))
}

/// Import a batch of exported cases. Entries without a patient payload
/// are skipped — there is nothing to attach the rest to. A failing
/// entry rolls back on its own and the batch continues.
pub fn import_cases(conn: &Connection, cases: &[ExportedCase]) -> ImportReport {
    let mut imported = 0;
    for (index, case) in cases.iter().enumerate() {
        if case.patient.is_none() {
            tracing::warn!(index, "Skipping import entry without patient payload");
            continue;
        }
        match import_single(conn, case) {
            Ok(()) => imported += 1,
            Err(e) => {
                tracing::warn!(index, error = %e, "Import entry failed, continuing");
            }
        }
    }
    let report = ImportReport {
        total: cases.len(),
        imported,
    };
    tracing::info!(total = report.total, imported = report.imported, "Import finished");
    report
}

fn import_single(conn: &Connection, case: &ExportedCase) -> Result<(), DatabaseError> {
    // Guarded by the caller.
    let Some(new_patient) = &case.patient else {
        return Ok(());
    };

    let tx = conn.unchecked_transaction()?;

    let patient = insert_patient(&tx, new_patient)?;

    // Every patient row keeps a questionnaire companion, even when the
    // export did not carry one.
    match &case.meld {
        Some(meld) => {
            insert_meld(&tx, &meld.to_storage(patient.id))?;
        }
        None => {
            insert_empty_meld(&tx, patient.id)?;
        }
    }

    if let Some(mris) = &case.mris {
        for mri in mris {
            let inserted = insert_mri(&tx, patient.id, &mri.study_id)?;
            for annotation in &mri.annotations {
                insert_annotation(
                    &tx,
                    &AnnotationForm {
                        mri_id: inserted.id,
                        arrow_num: annotation.arrow_num.clone(),
                        entity_name: annotation.entity_name.clone(),
                        entity_code: annotation.entity_code.clone(),
                        epileptogenic: annotation.epileptogenic.clone(),
                        therapy: annotation.therapy.clone(),
                        follow_up: annotation.follow_up.clone(),
                        ..Default::default()
                    },
                )?;
            }
        }
        refresh_lesional_flag(&tx, patient.id)?;
    }

    tx.commit()?;
    Ok(())
}
