//! Best-effort JSON mirror of the notification ledger.
//!
//! The document is a single JSON array rewritten in full on every append.
//! Appends are serialized by a lock owned by the [`MirrorDocument`]; share
//! one instance per process. The primary ledger stays authoritative: a failed
//! mirror write is logged and dropped, and a crash between the primary
//! commit and the mirror write loses that mirror entry.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use restock_common::types::{DeliveryOutcome, NotificationRecord};

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Failed to read mirror document: {0}")]
    Read(#[source] std::io::Error),

    #[error("Mirror document is not a JSON array of notifications: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to encode mirror document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to write mirror document: {0}")]
    Write(#[source] std::io::Error),
}

/// One notification as stored in the mirror document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorEntry {
    pub user_id: i64,
    pub item_id: i64,
    pub channel: String,
    pub status: DeliveryOutcome,
    pub created_at: DateTime<Utc>,
}

impl From<&NotificationRecord> for MirrorEntry {
    fn from(record: &NotificationRecord) -> Self {
        Self {
            user_id: record.user_id,
            item_id: record.item_id,
            channel: record.channel.clone(),
            status: record.status,
            created_at: record.created_at,
        }
    }
}

pub struct MirrorDocument {
    path: PathBuf,
    lock: Mutex<()>,
}

impl MirrorDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `record`, logging instead of returning any failure.
    pub async fn append(&self, record: &NotificationRecord) {
        if let Err(e) = self.try_append(record).await {
            tracing::warn!(
                path = %self.path.display(),
                user_id = record.user_id,
                item_id = record.item_id,
                channel = %record.channel,
                error = %e,
                "Failed to mirror notification record"
            );
        }
    }

    /// Read-modify-write the whole document under the mirror lock.
    pub async fn try_append(&self, record: &NotificationRecord) -> Result<(), MirrorError> {
        let _guard = self.lock.lock().await;

        let mut entries = self.read_entries().await?;
        entries.push(MirrorEntry::from(record));

        let data = serde_json::to_vec_pretty(&entries).map_err(MirrorError::Encode)?;
        tokio::fs::write(&self.path, data)
            .await
            .map_err(MirrorError::Write)?;

        Ok(())
    }

    /// A missing or empty file reads as an empty array.
    async fn read_entries(&self) -> Result<Vec<MirrorEntry>, MirrorError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(MirrorError::Read(e)),
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&data).map_err(MirrorError::Parse)
    }
}
