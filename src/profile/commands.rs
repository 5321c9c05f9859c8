use chrono::Utc;
use tauri::State;

use crate::{db::models::Profile, AppState};

#[tauri::command]
pub async fn get_profile(state: State<'_, AppState>) -> Result<Profile, String> {
    let subject = state
        .session
        .require_subject()
        .await
        .map_err(|e| e.to_string())?;

    let profile = state
        .db
        .get_profile(&subject.uid)
        .await
        .map_err(|e| e.to_string())?;

    Ok(profile.unwrap_or_default())
}

#[tauri::command]
pub async fn save_profile(state: State<'_, AppState>, profile: Profile) -> Result<(), String> {
    let subject = state
        .session
        .require_subject()
        .await
        .map_err(|e| e.to_string())?;

    state
        .db
        .save_profile(&subject.uid, &profile, Utc::now())
        .await
        .map_err(|e| e.to_string())
}
