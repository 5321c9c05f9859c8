use anyhow::Result;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, to_severity},
    models::Observation,
};

fn row_to_observation(row: &Row) -> Result<Observation> {
    let severity: i64 = row.get("severity")?;
    let created_at: String = row.get("created_at")?;

    Ok(Observation {
        id: row.get("id")?,
        subject_uid: row.get("subject_uid")?,
        severity: to_severity(severity, "severity")?,
        summary: row.get("summary")?,
        image_ref: row.get("image_ref")?,
        file_name: row.get("file_name")?,
        phash: row.get("phash")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_observation(&self, observation: &Observation) -> Result<()> {
        let record = observation.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO photos (id, subject_uid, severity, summary, image_ref, file_name, phash, created_at, seq)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                         (SELECT COALESCE(MAX(seq), 0) + 1 FROM photos WHERE subject_uid = ?2))",
                params![
                    record.id,
                    record.subject_uid,
                    i64::from(record.severity),
                    record.summary,
                    record.image_ref,
                    record.file_name,
                    record.phash,
                    record.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// All observations for a subject in insertion order (oldest first), the
    /// canonical order the analyzer's trend math relies on.
    pub async fn list_observations(&self, subject_uid: &str) -> Result<Vec<Observation>> {
        let subject_uid = subject_uid.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, subject_uid, severity, summary, image_ref, file_name, phash, created_at
                 FROM photos
                 WHERE subject_uid = ?1
                 ORDER BY seq ASC",
            )?;

            let mut rows = stmt.query(params![subject_uid])?;
            let mut observations = Vec::new();
            while let Some(row) = rows.next()? {
                observations.push(row_to_observation(row)?);
            }

            Ok(observations)
        })
        .await
    }

    pub async fn get_observation(
        &self,
        subject_uid: &str,
        id: &str,
    ) -> Result<Option<Observation>> {
        let subject_uid = subject_uid.to_string();
        let id = id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, subject_uid, severity, summary, image_ref, file_name, phash, created_at
                 FROM photos
                 WHERE subject_uid = ?1 AND id = ?2",
            )?;

            let mut rows = stmt.query(params![subject_uid, id])?;
            let observation = match rows.next()? {
                Some(row) => Some(row_to_observation(row)?),
                None => None,
            };
            Ok(observation)
        })
        .await
    }

    /// Deletes one observation. An absent id is not an error; the returned
    /// flag says whether a row actually went away.
    pub async fn delete_observation(&self, subject_uid: &str, id: &str) -> Result<bool> {
        let subject_uid = subject_uid.to_string();
        let id = id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "DELETE FROM photos WHERE subject_uid = ?1 AND id = ?2",
                params![subject_uid, id],
            )?;
            Ok(rows_affected > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Account;
    use chrono::Utc;
    use tempfile::TempDir;

    async fn test_db() -> (TempDir, Database) {
        let dir = TempDir::new().expect("temp dir");
        let db = Database::new(dir.path().join("test.sqlite3")).expect("database");

        db.insert_account(&Account {
            uid: "subject-1".into(),
            email: "a@example.com".into(),
            password_hash: "hash".into(),
            password_salt: "salt".into(),
            created_at: Utc::now(),
        })
        .await
        .expect("account");

        (dir, db)
    }

    fn observation(id: &str, severity: u8) -> Observation {
        Observation {
            id: id.to_string(),
            subject_uid: "subject-1".to_string(),
            severity,
            summary: format!("severity {severity}"),
            image_ref: format!("subject-1/{id}.png"),
            file_name: format!("{id}.png"),
            phash: Some("AAAA".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn listing_preserves_insertion_order() {
        let (_dir, db) = test_db().await;

        for (id, severity) in [("a", 7), ("b", 2), ("c", 5)] {
            db.insert_observation(&observation(id, severity))
                .await
                .expect("insert");
        }

        let listed = db.list_observations("subject-1").await.expect("list");
        let severities: Vec<u8> = listed.iter().map(|o| o.severity).collect();
        assert_eq!(severities, vec![7, 2, 5]);
        assert_eq!(listed[0].summary, "severity 7");
    }

    #[tokio::test]
    async fn delete_of_missing_id_is_a_noop() {
        let (_dir, db) = test_db().await;
        db.insert_observation(&observation("a", 4))
            .await
            .expect("insert");

        let removed = db
            .delete_observation("subject-1", "no-such-id")
            .await
            .expect("delete");
        assert!(!removed);
        assert_eq!(db.list_observations("subject-1").await.unwrap().len(), 1);

        let removed = db.delete_observation("subject-1", "a").await.unwrap();
        assert!(removed);
        assert!(db.list_observations("subject-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn observations_are_scoped_to_their_subject() {
        let (_dir, db) = test_db().await;
        db.insert_observation(&observation("a", 4))
            .await
            .expect("insert");

        assert!(db.list_observations("other").await.unwrap().is_empty());
        assert!(db.get_observation("other", "a").await.unwrap().is_none());
        assert!(db
            .get_observation("subject-1", "a")
            .await
            .unwrap()
            .is_some());
    }
}
