//! User activation lookups.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::UserStatus;

/// Reports whether a user principal is active
#[async_trait]
pub trait UserStatusProvider: Send + Sync {
    async fn is_active(&self, user_id: Uuid) -> AppResult<bool>;
}

/// User directory held in memory; unknown users count as inactive
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<Uuid, bool>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, status: UserStatus) {
        self.users.insert(status.user_id, status.active);
    }
}

#[async_trait]
impl UserStatusProvider for InMemoryUserDirectory {
    async fn is_active(&self, user_id: Uuid) -> AppResult<bool> {
        Ok(self.users.get(&user_id).map(|active| *active).unwrap_or(false))
    }
}
