//! Contact directory lookups.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::ContactRecord;

/// Channel whose address must be unique across users
const EMAIL_CHANNEL: &str = "email";

/// Exact lookup of contact details by user id
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Returns the contact record of `user_id`, or `None` if the user has none
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<ContactRecord>>;
}

/// Contact directory held in memory.
///
/// Keeps one record per user id and enforces email uniqueness the way the
/// `unq_contact_details_email` constraint does in the relational store.
#[derive(Debug, Default)]
pub struct InMemoryContactDirectory {
    records: DashMap<Uuid, ContactRecord>,
    emails: DashMap<String, Uuid>,
}

impl InMemoryContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the record for `record.user_id`
    pub fn upsert(&self, record: ContactRecord) -> AppResult<()> {
        let new_email = record
            .address_for(EMAIL_CHANNEL)
            .map(|entry| entry.address.trim().to_lowercase());

        if let Some(ref email) = new_email {
            match self.emails.entry(email.clone()) {
                Entry::Occupied(owner) if *owner.get() != record.user_id => {
                    return Err(AppError::Duplicate {
                        entity: "contact_details".to_string(),
                        field: "email".to_string(),
                        value: email.clone(),
                        constraint: "unq_contact_details_email".to_string(),
                    });
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(record.user_id);
                }
            }
        }

        if let Some(previous) = self.records.insert(record.user_id, record) {
            let old_email = previous
                .address_for(EMAIL_CHANNEL)
                .map(|entry| entry.address.trim().to_lowercase());
            if old_email.is_some() && old_email != new_email {
                if let Some(old) = old_email {
                    self.emails.remove(&old);
                }
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ContactDirectory for InMemoryContactDirectory {
    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<ContactRecord>> {
        Ok(self.records.get(&user_id).map(|entry| entry.value().clone()))
    }
}
