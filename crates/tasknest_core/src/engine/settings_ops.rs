//! Settings transitions.

use crate::model::settings::SettingsPatch;
use crate::model::state::AppState;

/// Shallow-merges the provided fields into the settings.
pub fn update_settings(mut state: AppState, patch: SettingsPatch) -> AppState {
    if let Some(api_key) = patch.api_key {
        state.settings.api_key = api_key;
    }
    if let Some(model) = patch.model {
        state.settings.model = model;
    }
    state
}

/// Blanks the API key and keeps the selected model.
pub fn clear_settings(mut state: AppState) -> AppState {
    state.settings.api_key.clear();
    state
}
