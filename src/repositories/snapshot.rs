//! JSON fixture loading for the in-memory stores.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    InMemoryContactDirectory, InMemoryDigestConfigurationStore, InMemoryUserDirectory,
    Repositories,
};
use crate::error::{AppError, AppResult};
use crate::models::{ContactRecord, DigestConfiguration, UserStatus};

/// Point-in-time copy of the directories the dispatcher reads from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    #[serde(default)]
    pub contacts: Vec<ContactRecord>,
    #[serde(default)]
    pub users: Vec<UserStatus>,
    #[serde(default)]
    pub digest_configurations: Vec<DigestConfiguration>,
}

impl DirectorySnapshot {
    /// Reads a snapshot from a JSON file
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::Validation {
            field: "directory".to_string(),
            reason: format!("Cannot read {}: {}", path.display(), e),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> AppResult<Self> {
        serde_json::from_str(content).map_err(|e| AppError::Validation {
            field: "directory".to_string(),
            reason: format!("Invalid directory snapshot: {}", e),
        })
    }

    /// Loads every entry into fresh in-memory stores
    ///
    /// Fails on the first constraint violation, e.g. two users sharing an
    /// email address or two digest configurations sharing a tag.
    pub fn into_repositories(self) -> AppResult<Repositories> {
        let contacts = InMemoryContactDirectory::new();
        for record in self.contacts {
            contacts.upsert(record)?;
        }

        let users = InMemoryUserDirectory::new();
        for status in self.users {
            users.upsert(status);
        }

        let digests = InMemoryDigestConfigurationStore::new();
        for configuration in self.digest_configurations {
            digests.insert(configuration)?;
        }

        tracing::debug!(
            contacts = contacts.len(),
            digest_configurations = digests.len(),
            "directory snapshot loaded"
        );

        Ok(Repositories {
            contacts: Arc::new(contacts),
            users: Arc::new(users),
            digests: Arc::new(digests),
        })
    }
}
