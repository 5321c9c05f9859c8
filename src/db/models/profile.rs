use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dermatologist {
    pub name: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotebookEntry {
    pub date: DateTime<Utc>,
    pub notes: String,
}

/// The whole-document profile a subject edits in one piece, stored as a
/// single JSON blob per subject. Reads of a missing document yield the
/// default (all-empty) profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub journey_start: String,
    pub reason: String,
    pub medications: Vec<Medication>,
    pub dermatologists: Vec<Dermatologist>,
    pub notebook: Vec<NotebookEntry>,
}
