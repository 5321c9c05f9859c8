use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::info;

/// Filesystem-backed store for photo bytes under the app data directory.
/// References are paths relative to the store root; nothing here ever
/// interprets the bytes it holds.
#[derive(Clone)]
pub struct AssetStore {
    root: Arc<PathBuf>,
}

impl AssetStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create asset directory {}", root.display()))?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    /// Writes the bytes under a per-subject directory and returns the opaque
    /// reference later used to resolve or remove them. File names are
    /// prefixed with a millisecond timestamp so repeated uploads of the same
    /// file never collide.
    pub fn store(&self, subject_uid: &str, file_name: &str, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            bail!("refusing to store an empty asset");
        }

        let safe_name = sanitize_file_name(file_name);
        let relative = format!(
            "{subject_uid}/{}_{safe_name}",
            Utc::now().timestamp_millis()
        );
        let path = self.root.join(&relative);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create subject directory {}", parent.display())
            })?;
        }

        fs::write(&path, bytes)
            .with_context(|| format!("failed to write asset {}", path.display()))?;

        info!("Stored asset {relative} ({} bytes)", bytes.len());
        Ok(relative)
    }

    pub fn resolve(&self, reference: &str) -> PathBuf {
        self.root.join(reference)
    }

    /// Removes the referenced asset. A missing file is not an error; the
    /// observation row is the source of truth and may outlive a cleanup.
    pub fn remove(&self, reference: &str) -> Result<()> {
        let path = self.resolve(reference);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to remove asset {}", path.display()))
            }
        }
    }
}

/// Keeps user-supplied names from escaping the store root.
fn sanitize_file_name(file_name: &str) -> String {
    let cleaned: String = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();

    if cleaned.is_empty() || cleaned == ".." {
        "upload".to_string()
    } else {
        cleaned
    }
}
