use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use crate::db::{connection::Database, models::Profile};

impl Database {
    pub async fn get_profile(&self, subject_uid: &str) -> Result<Option<Profile>> {
        let subject_uid = subject_uid.to_string();
        self.execute(move |conn| {
            let document: Option<String> = conn
                .query_row(
                    "SELECT document FROM profiles WHERE subject_uid = ?1",
                    params![subject_uid],
                    |row| row.get(0),
                )
                .optional()?;

            match document {
                Some(raw) => {
                    let profile = serde_json::from_str(&raw)
                        .context("failed to deserialize profile document")?;
                    Ok(Some(profile))
                }
                None => Ok(None),
            }
        })
        .await
    }

    /// Overwrites the subject's whole profile document, creating it on first
    /// save.
    pub async fn save_profile(
        &self,
        subject_uid: &str,
        profile: &Profile,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let subject_uid = subject_uid.to_string();
        let document =
            serde_json::to_string(profile).context("failed to serialize profile document")?;
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO profiles (subject_uid, document, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(subject_uid) DO UPDATE SET
                     document = excluded.document,
                     updated_at = excluded.updated_at",
                params![subject_uid, document, updated_at.to_rfc3339()],
            )?;
            Ok(())
        })
        .await
    }
}
