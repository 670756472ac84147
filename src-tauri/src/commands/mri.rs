//! MRI and annotation IPC commands. Every mutation here can change the
//! derived lesional flag on the owning patient, so each one refreshes
//! it and broadcasts the updated patient row.

use rusqlite::Connection;
use tauri::{AppHandle, State};

use crate::commands::{emit_sync, PatientListSync};
use crate::db::repository;
use crate::models::{Annotation, AnnotationForm, Mri};
use crate::state::AppState;

fn refresh_and_broadcast(conn: &Connection, app: &AppHandle, patient_id: i64) {
    match repository::refresh_lesional_flag(conn, patient_id) {
        Ok(Some(patient)) => emit_sync(app, PatientListSync::Upserted { patient }),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(patient_id, error = %e, "Lesional flag refresh failed");
        }
    }
}

#[tauri::command]
pub fn create_mri(
    patient_id: i64,
    study_id: String,
    state: State<'_, AppState>,
) -> Result<Mri, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    repository::insert_mri(&conn, patient_id, &study_id).map_err(|e| e.to_string())
}

/// Delete an MRI with its annotations; the owner's lesional flag may
/// flip as a result.
#[tauri::command]
pub fn delete_mri(
    mri_id: i64,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<usize, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    // Resolve the owner before the row disappears.
    let patient_id = repository::mri_patient_id(&conn, mri_id).map_err(|e| e.to_string())?;
    let deleted = repository::delete_mri(&conn, mri_id).map_err(|e| e.to_string())?;
    if deleted > 0 {
        if let Some(patient_id) = patient_id {
            refresh_and_broadcast(&conn, &app, patient_id);
        }
    }
    Ok(deleted)
}

#[tauri::command]
pub fn create_annotation(
    annotation: AnnotationForm,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<Annotation, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    let created =
        repository::insert_annotation(&conn, &annotation).map_err(|e| e.to_string())?;
    if let Some(patient_id) =
        repository::mri_patient_id(&conn, created.mri_id).map_err(|e| e.to_string())?
    {
        refresh_and_broadcast(&conn, &app, patient_id);
    }
    Ok(created)
}

#[tauri::command]
pub fn update_annotation(
    annotation: AnnotationForm,
    state: State<'_, AppState>,
) -> Result<Annotation, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    repository::update_annotation(&conn, &annotation)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("No annotation with id {}", annotation.ann_id))
}

#[tauri::command]
pub fn delete_annotation(
    ann_id: i64,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<usize, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    let patient_id =
        repository::annotation_patient_id(&conn, ann_id).map_err(|e| e.to_string())?;
    let deleted = repository::delete_annotation(&conn, ann_id).map_err(|e| e.to_string())?;
    if deleted > 0 {
        if let Some(patient_id) = patient_id {
            refresh_and_broadcast(&conn, &app, patient_id);
        }
    }
    Ok(deleted)
}
