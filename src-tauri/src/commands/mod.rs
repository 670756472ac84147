pub mod case;
pub mod dictionary;
pub mod export;
pub mod import;
pub mod mri;

use serde::Serialize;
use tauri::{AppHandle, Emitter};

use crate::models::Patient;

/// Event every window listens to for keeping its patient list current.
pub const PATIENT_LIST_SYNC: &str = "patient-list-sync";

/// Payload of [`PATIENT_LIST_SYNC`]. `Upserted` and `Removed` let the
/// frontend patch its list in place; `Refresh` (bulk import) tells it
/// to refetch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PatientListSync {
    Upserted { patient: Patient },
    Removed { id: i64 },
    Refresh,
}

/// Broadcast a list change. Emission failures are logged, not
/// propagated — the database write already happened.
pub(crate) fn emit_sync(app: &AppHandle, payload: PatientListSync) {
    if let Err(e) = app.emit(PATIENT_LIST_SYNC, payload) {
        tracing::warn!(error = %e, "Failed to emit patient list sync event");
    }
}

/// Health check IPC command — verifies backend is running
#[tauri::command]
pub fn health_check() -> String {
    tracing::debug!("Health check called");
    "ok".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_returns_ok() {
        assert_eq!(health_check(), "ok");
    }

    #[test]
    fn sync_payload_carries_action_tag() {
        let json = serde_json::to_string(&PatientListSync::Removed { id: 7 }).unwrap();
        assert!(json.contains("\"action\":\"removed\""));
        assert!(json.contains("\"id\":7"));

        let json = serde_json::to_string(&PatientListSync::Refresh).unwrap();
        assert_eq!(json, r#"{"action":"refresh"}"#);
    }
}
