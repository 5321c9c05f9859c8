use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One severity record tied to one uploaded photo.
///
/// `summary` is derived text computed once at creation time and never
/// rewritten. `image_ref` is an opaque key into the asset store; nothing in
/// the app reads the bytes back through it except the webview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: String,
    pub subject_uid: String,
    pub severity: u8,
    pub summary: String,
    pub image_ref: String,
    pub file_name: String,
    pub phash: Option<String>,
    pub created_at: DateTime<Utc>,
}
