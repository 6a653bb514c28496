//! User contact details.
//!
//! A [`ContactRecord`] is owned by the contact-management side of the
//! platform; the dispatch core only ever reads it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::outcome::SkipReason;

/// Address for one channel together with its verification state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAddress {
    pub address: String,
    #[serde(default)]
    pub verified: bool,
}

impl ChannelAddress {
    pub fn verified(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            verified: true,
        }
    }

    pub fn unverified(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            verified: false,
        }
    }
}

/// Contact details of a single user across all channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub user_id: Uuid,
    /// Global opt-in flag for non-important notifications
    #[serde(default = "default_allow_notifications")]
    pub allow_notifications: bool,
    /// Channel name to address, e.g. `"email" -> a@example.org`
    #[serde(default)]
    pub channels: BTreeMap<String, ChannelAddress>,
}

fn default_allow_notifications() -> bool {
    true
}

impl ContactRecord {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            allow_notifications: true,
            channels: BTreeMap::new(),
        }
    }

    /// Builder-style helper that sets the address for a channel
    pub fn with_channel(mut self, channel: impl Into<String>, address: ChannelAddress) -> Self {
        self.channels.insert(channel.into(), address);
        self
    }

    pub fn with_allow_notifications(mut self, allow: bool) -> Self {
        self.allow_notifications = allow;
        self
    }

    /// Non-blank address registered for `channel`, verified or not
    pub fn address_for(&self, channel: &str) -> Option<&ChannelAddress> {
        self.channels
            .get(channel)
            .filter(|entry| !entry.address.trim().is_empty())
    }

    /// Address for `channel` only if it has been verified
    pub fn verified_address_for(&self, channel: &str) -> Option<&str> {
        self.address_for(channel)
            .filter(|entry| entry.verified)
            .map(|entry| entry.address.as_str())
    }

    /// Explains why `channel` cannot be used for this contact
    pub fn ineligibility_reason(&self, channel: &str) -> SkipReason {
        match self.address_for(channel) {
            None => SkipReason::MissingAddress,
            Some(entry) if !entry.verified => SkipReason::Unverified,
            Some(_) => SkipReason::ChannelIneligible,
        }
    }
}
