//! Digest configuration lookups.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::{AppError, AppResult};
use crate::models::DigestConfiguration;

/// Lookup of digest configurations by tag
#[async_trait]
pub trait DigestConfigurationStore: Send + Sync {
    /// Exact, case-sensitive match on the tag; `None` means "send immediately"
    async fn find_by_tag(&self, tag: &str) -> AppResult<Option<DigestConfiguration>>;
}

/// Digest configurations held in memory, keyed by tag
#[derive(Debug, Default)]
pub struct InMemoryDigestConfigurationStore {
    configurations: DashMap<String, DigestConfiguration>,
}

impl InMemoryDigestConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a configuration; a tag already in use is a constraint violation
    pub fn insert(&self, configuration: DigestConfiguration) -> AppResult<()> {
        match self.configurations.entry(configuration.tag.clone()) {
            Entry::Occupied(existing) => Err(AppError::Duplicate {
                entity: "digest_configurations".to_string(),
                field: "tag".to_string(),
                value: existing.key().clone(),
                constraint: "unq_digest_configurations_tag".to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(configuration);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
}

#[async_trait]
impl DigestConfigurationStore for InMemoryDigestConfigurationStore {
    async fn find_by_tag(&self, tag: &str) -> AppResult<Option<DigestConfiguration>> {
        Ok(self.configurations.get(tag).map(|entry| entry.value().clone()))
    }
}
