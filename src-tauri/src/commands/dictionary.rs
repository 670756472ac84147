use tauri::State;

use crate::dictionary::{self, EntityGroup, FormControl};
use crate::state::AppState;

/// Form layout the questionnaire screen renders from, in display order.
#[tauri::command]
pub fn get_form_definition(state: State<'_, AppState>) -> Result<Vec<FormControl>, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    dictionary::form_definition(&conn).map_err(|e| e.to_string())
}

/// Entity dictionary for the annotation picker, grouped.
#[tauri::command]
pub fn get_entity_dictionary(state: State<'_, AppState>) -> Result<Vec<EntityGroup>, String> {
    let conn = state.db().map_err(|e| e.to_string())?;
    dictionary::entity_groups(&conn).map_err(|e| e.to_string())
}
