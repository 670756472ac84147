//! Export IPC commands: collect the requested scope, shape it for the
//! chosen format, and write the file the save dialog picked.

use std::path::Path;

use serde::Serialize;
use tauri::State;

use crate::export::{
    collect, default_file_name, flat_rows, nested_cases, write_flat_csv, write_flat_xlsx,
    write_nested_json,
};
use crate::models::{ExportConfig, ExportFormat, ExportScope};
use crate::state::AppState;

/// What an export run produced, for the confirmation toast.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub records: usize,
    pub path: String,
}

#[tauri::command]
pub fn export_cases(
    config: ExportConfig,
    state: State<'_, AppState>,
) -> Result<ExportSummary, String> {
    let scope = ExportScope::from_list(&config.data_scope);
    if scope.is_empty() {
        return Err("Nothing selected for export".to_string());
    }

    let conn = state.db().map_err(|e| e.to_string())?;
    let data = collect(&conn, scope, config.entities.as_deref()).map_err(|e| e.to_string())?;
    drop(conn);

    let path = Path::new(&config.path);
    let records = match config.format {
        ExportFormat::Json => {
            let cases = nested_cases(&data);
            write_nested_json(path, &cases).map_err(|e| e.to_string())?;
            cases.len()
        }
        ExportFormat::Csv => {
            let rows = flat_rows(&data);
            write_flat_csv(path, &rows).map_err(|e| e.to_string())?;
            rows.len()
        }
        ExportFormat::Xlsx => {
            let rows = flat_rows(&data);
            write_flat_xlsx(path, &rows).map_err(|e| e.to_string())?;
            rows.len()
        }
    };

    tracing::info!(records, path = %config.path, "Export written");
    Ok(ExportSummary {
        records,
        path: config.path,
    })
}

/// Default file name for the save dialog.
#[tauri::command]
pub fn suggest_export_file_name(data_scope: String, format: ExportFormat) -> String {
    default_file_name(&data_scope, format)
}
