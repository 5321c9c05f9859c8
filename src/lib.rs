mod analysis;
mod auth;
mod classifier;
mod db;
mod photos;
mod profile;
mod storage;

use std::sync::Arc;

use auth::commands::{get_session, sign_in, sign_out, sign_up};
use auth::SessionManager;
use classifier::SimulatedClassifier;
use db::Database;
use photos::commands::{delete_photo, get_dashboard_summary, list_photos, upload_photo};
use photos::PhotoController;
use profile::commands::{get_profile, save_profile};
use storage::AssetStore;
use tauri::Manager;

pub(crate) struct AppState {
    pub(crate) db: Database,
    pub(crate) session: SessionManager,
    pub(crate) photos: PhotoController,
    pub(crate) assets: AssetStore,
}

/// Follows session and photo-history changes for the log. Also keeps one
/// long-lived receiver on each watch channel so changes are observable even
/// while no command is in flight.
fn spawn_change_logger(
    mut session_rx: tokio::sync::watch::Receiver<Option<db::models::Subject>>,
    mut photos_rx: tokio::sync::watch::Receiver<u64>,
) {
    tauri::async_runtime::spawn(async move {
        loop {
            tokio::select! {
                changed = session_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    match session_rx.borrow_and_update().as_ref() {
                        Some(subject) => log::info!("Session changed: {}", subject.uid),
                        None => log::info!("Session cleared"),
                    }
                }
                changed = photos_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    log::debug!("Photo history revision {}", *photos_rx.borrow_and_update());
                }
            }
        }
    });
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("DermaTrack starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let db_path = app_data_dir.join("dermatrack.sqlite3");
                let database = Database::new(db_path)?;

                let assets = AssetStore::new(app_data_dir.join("photos"))?;

                let session = SessionManager::new(app.handle().clone(), database.clone());
                let photos = PhotoController::new(
                    app.handle().clone(),
                    database.clone(),
                    assets.clone(),
                    Arc::new(SimulatedClassifier),
                );

                spawn_change_logger(session.subscribe(), photos.subscribe());

                app.manage(AppState {
                    db: database,
                    session,
                    photos,
                    assets,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            sign_up,
            sign_in,
            sign_out,
            get_session,
            upload_photo,
            list_photos,
            delete_photo,
            get_dashboard_summary,
            get_profile,
            save_profile,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
