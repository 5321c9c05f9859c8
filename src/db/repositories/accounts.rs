use anyhow::Result;
use rusqlite::{params, OptionalExtension};

use crate::db::{connection::Database, helpers::parse_datetime, models::Account};

impl Database {
    pub async fn insert_account(&self, account: &Account) -> Result<()> {
        let record = account.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO accounts (uid, email, password_hash, password_salt, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.uid,
                    record.email,
                    record.password_hash,
                    record.password_salt,
                    record.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let email = email.to_string();
        self.execute(move |conn| {
            let row = conn
                .query_row(
                    "SELECT uid, email, password_hash, password_salt, created_at
                     FROM accounts
                     WHERE email = ?1",
                    params![email],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, String>(4)?,
                        ))
                    },
                )
                .optional()?;

            match row {
                Some((uid, email, password_hash, password_salt, created_at)) => Ok(Some(Account {
                    uid,
                    email,
                    password_hash,
                    password_salt,
                    created_at: parse_datetime(&created_at, "created_at")?,
                })),
                None => Ok(None),
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn account(uid: &str, email: &str) -> Account {
        Account {
            uid: uid.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            password_salt: "salt".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn finds_inserted_account_by_email() {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("test.sqlite3")).unwrap();

        db.insert_account(&account("u1", "a@example.com"))
            .await
            .expect("insert");

        let found = db
            .find_account_by_email("a@example.com")
            .await
            .expect("query")
            .expect("account exists");
        assert_eq!(found.uid, "u1");

        assert!(db
            .find_account_by_email("b@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn rejects_duplicate_emails() {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("test.sqlite3")).unwrap();

        db.insert_account(&account("u1", "a@example.com"))
            .await
            .expect("insert");
        assert!(db
            .insert_account(&account("u2", "a@example.com"))
            .await
            .is_err());
    }
}
