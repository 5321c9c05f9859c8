use tauri::State;

use crate::{db::models::Subject, AppState};

#[tauri::command]
pub async fn sign_up(
    state: State<'_, AppState>,
    email: String,
    password: String,
) -> Result<Subject, String> {
    state
        .session
        .sign_up(&email, &password)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn sign_in(
    state: State<'_, AppState>,
    email: String,
    password: String,
) -> Result<Subject, String> {
    state
        .session
        .sign_in(&email, &password)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn sign_out(state: State<'_, AppState>) -> Result<(), String> {
    state.session.sign_out().await;
    Ok(())
}

#[tauri::command]
pub async fn get_session(state: State<'_, AppState>) -> Result<Option<Subject>, String> {
    Ok(state.session.current().await)
}
