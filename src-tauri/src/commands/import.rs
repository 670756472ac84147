use std::path::Path;

use tauri::{AppHandle, State};

use crate::commands::{emit_sync, PatientListSync};
use crate::import;
use crate::models::ImportReport;
use crate::state::AppState;

/// Import a nested JSON export. Partial success is reported, not
/// treated as an error; an unreadable or unparsable file is.
#[tauri::command]
pub fn import_cases_file(
    path: String,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<ImportReport, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    let report =
        import::import_cases_file(&conn, Path::new(&path)).map_err(|e| e.to_string())?;
    if report.imported > 0 {
        emit_sync(&app, PatientListSync::Refresh);
    }
    Ok(report)
}
