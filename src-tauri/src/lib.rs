pub mod commands;
pub mod config;
pub mod db;
pub mod dictionary;
pub mod export;
pub mod import;
pub mod models;
pub mod state;

use tracing_subscriber::EnvFilter;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let app_state = match state::AppState::init() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Could not open the application database");
            return;
        }
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            commands::health_check,
            commands::case::list_patients,
            commands::case::search_advanced,
            commands::case::create_case,
            commands::case::get_case,
            commands::case::delete_case,
            commands::case::update_patient_info,
            commands::case::update_meld_data,
            commands::mri::create_mri,
            commands::mri::delete_mri,
            commands::mri::create_annotation,
            commands::mri::update_annotation,
            commands::mri::delete_annotation,
            commands::export::export_cases,
            commands::export::suggest_export_file_name,
            commands::import::import_cases_file,
            commands::dictionary::get_form_definition,
            commands::dictionary::get_entity_dictionary,
        ])
        .run(tauri::generate_context!())
        .expect("error while running MELD Entry");
}
