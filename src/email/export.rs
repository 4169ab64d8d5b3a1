use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::models::EmailRecord;
use crate::core::DraftError;

/// Somewhere to drop a downloaded file, e.g. the browser's download
/// prompt.
#[async_trait]
pub trait FileSaver: Send + Sync {
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<(), DraftError>;
}

/// Suggested filename for an exported message:
/// `<subject-or-"email">_<epoch-millis>.json`.
pub fn export_filename(subject: Option<&str>, now: DateTime<Utc>) -> String {
    let stem = subject.filter(|s| !s.is_empty()).unwrap_or("email");
    format!("{}_{}.json", stem, now.timestamp_millis())
}

/// Serialize the message as pretty printed JSON along with the
/// suggested filename.
pub fn export_email(
    email: &EmailRecord,
    now: DateTime<Utc>,
) -> Result<(String, Vec<u8>), DraftError> {
    let json =
        serde_json::to_string_pretty(email).map_err(|e| DraftError::ExportError(e.to_string()))?;
    Ok((
        export_filename(email.subject.as_deref(), now),
        json.into_bytes(),
    ))
}

/// Saves files into a directory on disk.
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Where `filename` ends up. Subjects can contain path separators
    /// so those are replaced.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        let safe: String = filename
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
            .collect();
        self.dir.join(safe)
    }
}

#[async_trait]
impl FileSaver for DirectorySaver {
    async fn save(&self, bytes: &[u8], filename: &str) -> Result<(), DraftError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DraftError::ExportError(e.to_string()))?;
        let path = self.path_for(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DraftError::ExportError(e.to_string()))?;
        tracing::info!("Saved {}", path.display());
        Ok(())
    }
}
