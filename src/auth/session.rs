use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use log::info;
use rand::RngCore;
use serde::Serialize;
use tauri::{AppHandle, Emitter};
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use crate::db::{
    models::{Account, Subject},
    Database,
};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct SessionChangedEvent {
    subject: Option<Subject>,
}

/// Local authenticated-session provider. Holds the signed-in subject, checks
/// credentials against the accounts table, and notifies both sides of the
/// app on every change: the webview via a `session-changed` event and Rust
/// listeners via a watch channel (dropping the receiver unsubscribes).
#[derive(Clone)]
pub struct SessionManager {
    db: Database,
    app_handle: AppHandle,
    current: Arc<Mutex<Option<Subject>>>,
    notifier: Arc<watch::Sender<Option<Subject>>>,
}

impl SessionManager {
    pub fn new(app_handle: AppHandle, db: Database) -> Self {
        let (notifier, _) = watch::channel(None);
        Self {
            db,
            app_handle,
            current: Arc::new(Mutex::new(None)),
            notifier: Arc::new(notifier),
        }
    }

    pub async fn current(&self) -> Option<Subject> {
        self.current.lock().await.clone()
    }

    /// The signed-in subject, or an error suitable for surfacing to the
    /// caller when nobody is.
    pub async fn require_subject(&self) -> Result<Subject> {
        self.current
            .lock()
            .await
            .clone()
            .ok_or_else(|| anyhow!("no authenticated user"))
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Subject>> {
        self.notifier.subscribe()
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Subject> {
        let email = normalize_email(email)?;
        if password.len() < MIN_PASSWORD_LEN {
            bail!("password must be at least {MIN_PASSWORD_LEN} characters");
        }

        if self.db.find_account_by_email(&email).await?.is_some() {
            bail!("an account with this email already exists");
        }

        let mut salt_bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = hex_encode(&salt_bytes);

        let account = Account {
            uid: Uuid::new_v4().to_string(),
            email,
            password_hash: hash_password(password, &salt),
            password_salt: salt,
            created_at: Utc::now(),
        };

        self.db.insert_account(&account).await?;
        info!("Created account for {}", account.uid);

        let subject = Subject::from(&account);
        self.set_current(Some(subject.clone())).await;
        Ok(subject)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Subject> {
        let email = normalize_email(email)?;
        let account = self
            .db
            .find_account_by_email(&email)
            .await?
            .ok_or_else(|| anyhow!("invalid email or password"))?;

        if hash_password(password, &account.password_salt) != account.password_hash {
            bail!("invalid email or password");
        }

        let subject = Subject::from(&account);
        info!("Signed in {}", subject.uid);
        self.set_current(Some(subject.clone())).await;
        Ok(subject)
    }

    pub async fn sign_out(&self) {
        info!("Signed out");
        self.set_current(None).await;
    }

    async fn set_current(&self, subject: Option<Subject>) {
        {
            let mut guard = self.current.lock().await;
            *guard = subject.clone();
        }

        let _ = self.notifier.send(subject.clone());
        let _ = self
            .app_handle
            .emit("session-changed", SessionChangedEvent { subject });
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let trimmed = email.trim().to_ascii_lowercase();
    if trimmed.is_empty() || !trimmed.contains('@') {
        bail!("a valid email address is required");
    }
    Ok(trimmed)
}

pub(crate) fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_hex().to_string()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
