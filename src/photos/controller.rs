use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info, warn};
use serde::Serialize;
use tauri::{AppHandle, Emitter};
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    analysis::{gauge_angle, gauge_arc, severity_band, GaugeArc, SeverityBand, SeverityHistory, Trend},
    classifier::SeverityClassifier,
    db::{
        models::{Observation, Subject},
        Database,
    },
    photos::phash,
    storage::AssetStore,
};

/// Geometry of the dashboard speedometer in SVG viewbox units.
const GAUGE_CENTER_X: f64 = 50.0;
const GAUGE_CENTER_Y: f64 = 50.0;
const GAUGE_RADIUS: f64 = 40.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeReading {
    pub angle_deg: f64,
    pub band: SeverityBand,
    pub arc: GaugeArc,
}

/// Everything the dashboard renders in one payload: aggregates plus the
/// display-ordered observation list (most recent first).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub average_severity: f64,
    pub trend: Trend,
    pub gauge: GaugeReading,
    pub observations: Vec<Observation>,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct PhotosChangedEvent {
    subject_uid: String,
    revision: u64,
}

/// Orchestrates the upload and deletion workflows around the pure analyzer:
/// decode-validate, classify, derive the stored summary, persist, notify.
/// Holds no history state of its own; every operation reloads the subject's
/// history from the document store and recomputes aggregates.
#[derive(Clone)]
pub struct PhotoController {
    db: Database,
    assets: AssetStore,
    classifier: Arc<dyn SeverityClassifier>,
    app_handle: AppHandle,
    revision: Arc<watch::Sender<u64>>,
}

impl PhotoController {
    pub fn new(
        app_handle: AppHandle,
        db: Database,
        assets: AssetStore,
        classifier: Arc<dyn SeverityClassifier>,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            db,
            assets,
            classifier,
            app_handle,
            revision: Arc::new(revision),
        }
    }

    /// Live-update handle for Rust-side listeners; the value is a revision
    /// counter that bumps on every successful mutation. Dropping the
    /// receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub async fn upload(
        &self,
        subject: &Subject,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<Observation> {
        image::load_from_memory(&bytes).context("unsupported or corrupt image")?;

        let phash = match phash::compute_phash(&bytes) {
            Ok(hash) => Some(hash),
            Err(err) => {
                warn!("Failed to compute perceptual hash: {err:#}");
                None
            }
        };

        let history = SeverityHistory::new(self.db.list_observations(&subject.uid).await?);

        if let Some(new_hash) = &phash {
            let duplicate = history.observations().iter().find(|existing| {
                existing
                    .phash
                    .as_deref()
                    .is_some_and(|known| phash::is_duplicate(known, new_hash))
            });
            if let Some(existing) = duplicate {
                warn!(
                    "Photo {file_name} looks like a re-upload of observation {}",
                    existing.id
                );
            }
        }

        let classification = self.classifier.classify(&bytes)?;
        let summary = format!(
            "{} {}",
            classification.summary,
            history.projected_summary(classification.severity)
        );

        let image_ref = self.assets.store(&subject.uid, &file_name, &bytes)?;

        let draft = Observation {
            id: Uuid::new_v4().to_string(),
            subject_uid: subject.uid.clone(),
            severity: classification.severity,
            summary,
            image_ref: image_ref.clone(),
            file_name,
            phash,
            created_at: Utc::now(),
        };

        // The analyzer is the validation point for the classifier contract.
        // On rejection the stored asset is orphaned, so clean it up before
        // surfacing the error; no row was written yet.
        let (_, observation) = match history.record(draft) {
            Ok(recorded) => recorded,
            Err(err) => {
                if let Err(cleanup_err) = self.assets.remove(&image_ref) {
                    error!("Failed to remove asset after rejected severity: {cleanup_err:#}");
                }
                return Err(err.into());
            }
        };

        self.db.insert_observation(&observation).await?;
        info!(
            "Recorded observation {} (severity {}) for {}",
            observation.id, observation.severity, subject.uid
        );

        self.notify_changed(&subject.uid);
        Ok(observation)
    }

    /// Observations in display order, most recent first.
    pub async fn list(&self, subject: &Subject) -> Result<Vec<Observation>> {
        let history = SeverityHistory::new(self.db.list_observations(&subject.uid).await?);
        Ok(history.display_order())
    }

    /// Deletes the observation and its stored photo. An unknown id is a
    /// no-op. A failure to remove the asset after the row is gone is logged
    /// and swallowed; the dangling file is harmless.
    pub async fn delete(&self, subject: &Subject, observation_id: &str) -> Result<()> {
        let Some(observation) = self.db.get_observation(&subject.uid, observation_id).await? else {
            return Ok(());
        };

        self.db.delete_observation(&subject.uid, observation_id).await?;

        if let Err(err) = self.assets.remove(&observation.image_ref) {
            error!("Failed to remove asset {}: {err:#}", observation.image_ref);
        }

        info!("Deleted observation {observation_id} for {}", subject.uid);
        self.notify_changed(&subject.uid);
        Ok(())
    }

    pub async fn dashboard(&self, subject: &Subject) -> Result<DashboardSummary> {
        let history = SeverityHistory::new(self.db.list_observations(&subject.uid).await?);

        let average = history.average();
        Ok(DashboardSummary {
            average_severity: average,
            trend: history.trend(),
            gauge: GaugeReading {
                angle_deg: gauge_angle(average),
                band: severity_band(average),
                arc: gauge_arc(average, GAUGE_CENTER_X, GAUGE_CENTER_Y, GAUGE_RADIUS),
            },
            observations: history.display_order(),
        })
    }

    fn notify_changed(&self, subject_uid: &str) {
        self.revision.send_modify(|rev| *rev += 1);
        let payload = PhotosChangedEvent {
            subject_uid: subject_uid.to_string(),
            revision: *self.revision.borrow(),
        };
        let _ = self.app_handle.emit("photos-changed", payload);
    }
}
