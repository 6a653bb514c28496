//! Hand-off point to the digest batching collaborator.
//!
//! The dispatcher only enqueues; scheduling and flushing batches belong to
//! whatever implements [`DigestQueue`].

use std::sync::Mutex;

use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ChannelMessage, DigestConfiguration};

/// A single channel message deferred into a digest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestEntry {
    pub user_id: Uuid,
    pub channel: String,
    pub to: String,
    pub from: String,
    pub message: ChannelMessage,
    pub configuration: DigestConfiguration,
    pub queued_at: Timestamp,
}

impl DigestEntry {
    pub fn tag(&self) -> &str {
        &self.configuration.tag
    }
}

#[async_trait]
pub trait DigestQueue: Send + Sync {
    async fn enqueue(&self, entry: DigestEntry) -> AppResult<()>;
}

/// Process-local queue that keeps entries in arrival order
///
/// Nothing flushes it; callers read the pending entries with
/// [`entries`](Self::entries).
#[derive(Debug, Default)]
pub struct InMemoryDigestQueue {
    entries: Mutex<Vec<DigestEntry>>,
}

impl InMemoryDigestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the pending entries
    pub fn entries(&self) -> Vec<DigestEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DigestQueue for InMemoryDigestQueue {
    async fn enqueue(&self, entry: DigestEntry) -> AppResult<()> {
        let mut entries = self.entries.lock().map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("digest queue lock poisoned: {}", e),
        })?;
        tracing::debug!(user_id = %entry.user_id, tag = entry.tag(), "digest entry queued");
        entries.push(entry);
        Ok(())
    }
}
