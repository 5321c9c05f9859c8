use serde::Serialize;
use tauri::State;

use crate::{db::models::Observation, photos::DashboardSummary, AppState};

/// An observation plus the resolved on-disk path the webview renders from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationView {
    #[serde(flatten)]
    pub observation: Observation,
    pub image_path: String,
}

fn to_view(state: &State<'_, AppState>, observation: Observation) -> ObservationView {
    let image_path = state
        .assets
        .resolve(&observation.image_ref)
        .display()
        .to_string();
    ObservationView {
        observation,
        image_path,
    }
}

#[tauri::command]
pub async fn upload_photo(
    state: State<'_, AppState>,
    file_name: String,
    image_bytes: Vec<u8>,
) -> Result<ObservationView, String> {
    let subject = state
        .session
        .require_subject()
        .await
        .map_err(|e| e.to_string())?;

    let observation = state
        .photos
        .upload(&subject, file_name, image_bytes)
        .await
        .map_err(|e| e.to_string())?;

    Ok(to_view(&state, observation))
}

#[tauri::command]
pub async fn list_photos(state: State<'_, AppState>) -> Result<Vec<ObservationView>, String> {
    let subject = state
        .session
        .require_subject()
        .await
        .map_err(|e| e.to_string())?;

    let observations = state
        .photos
        .list(&subject)
        .await
        .map_err(|e| e.to_string())?;

    Ok(observations
        .into_iter()
        .map(|observation| to_view(&state, observation))
        .collect())
}

#[tauri::command]
pub async fn delete_photo(state: State<'_, AppState>, observation_id: String) -> Result<(), String> {
    let subject = state
        .session
        .require_subject()
        .await
        .map_err(|e| e.to_string())?;

    state
        .photos
        .delete(&subject, &observation_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_dashboard_summary(
    state: State<'_, AppState>,
) -> Result<DashboardSummary, String> {
    let subject = state
        .session
        .require_subject()
        .await
        .map_err(|e| e.to_string())?;

    state
        .photos
        .dashboard(&subject)
        .await
        .map_err(|e| e.to_string())
}
