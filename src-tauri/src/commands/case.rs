//! Case lifecycle IPC commands: the home-screen list, advanced search,
//! and the create/read/update/delete surface for patients and their
//! questionnaire data.

use tauri::{AppHandle, State};

use crate::commands::{emit_sync, PatientListSync};
use crate::db::repository::{self, CaseBundle};
use crate::models::{AdvancedSearch, MeldRecord, MeldUpdate, NewPatient, Patient};
use crate::state::AppState;

/// Patient list for the home screen, ordered by surname.
#[tauri::command]
pub fn list_patients(state: State<'_, AppState>) -> Result<Vec<Patient>, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    repository::get_all_patients(&conn).map_err(|e| e.to_string())
}

/// Advanced search by study id or entity code. Empty filters yield an
/// empty list rather than the full table.
#[tauri::command]
pub fn search_advanced(
    filters: AdvancedSearch,
    state: State<'_, AppState>,
) -> Result<Vec<Patient>, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    repository::search_advanced(&conn, &filters).map_err(|e| e.to_string())
}

/// Create a new case: patient row plus its empty questionnaire row, in
/// one transaction.
#[tauri::command]
pub fn create_case(
    patient: NewPatient,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<Patient, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    let created = repository::create_case(&conn, &patient).map_err(|e| e.to_string())?;
    emit_sync(&app, PatientListSync::Upserted { patient: created.clone() });
    Ok(created)
}

/// Everything one case editor needs in a single fetch.
#[tauri::command]
pub fn get_case(patient_id: i64, state: State<'_, AppState>) -> Result<CaseBundle, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    repository::get_case(&conn, patient_id).map_err(|e| e.to_string())
}

/// Delete a case; MRIs, annotations and the questionnaire row go with
/// it through the cascade.
#[tauri::command]
pub fn delete_case(
    patient_id: i64,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<usize, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    let deleted = repository::delete_patient(&conn, patient_id).map_err(|e| e.to_string())?;
    if deleted > 0 {
        tracing::info!(patient_id, "Case deleted");
        emit_sync(&app, PatientListSync::Removed { id: patient_id });
    }
    Ok(deleted)
}

#[tauri::command]
pub fn update_patient_info(
    patient: Patient,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<Patient, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    let updated = repository::update_patient(&conn, &patient)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("No patient with id {}", patient.id))?;
    emit_sync(&app, PatientListSync::Upserted { patient: updated.clone() });
    Ok(updated)
}

/// Partial questionnaire update; only supplied fields are written.
#[tauri::command]
pub fn update_meld_data(
    update: MeldUpdate,
    state: State<'_, AppState>,
) -> Result<MeldRecord, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    repository::update_meld(&conn, &update)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("No questionnaire for patient {}", update.patient_id))
}
