//! Notification request models.
//!
//! A request owns its per-channel messages directly, keyed by channel name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message to be sent over a single channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// Message title/subject (ignored by channels without one)
    #[serde(default)]
    pub subject: Option<String>,
    /// Message body/content
    #[serde(default)]
    pub body: String,
    /// Digest tag; when set the message may be batched instead of sent
    #[serde(default)]
    pub digest_tag: Option<String>,
    /// Additional channel-specific fields
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ChannelMessage {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
            body: body.into(),
            digest_tag: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Body-only message, as used by channels without subjects
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            subject: None,
            body: body.into(),
            digest_tag: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_digest_tag(mut self, tag: impl Into<String>) -> Self {
        self.digest_tag = Some(tag.into());
        self
    }

    /// True when the body carries anything besides whitespace
    pub fn has_content(&self) -> bool {
        !self.body.trim().is_empty()
    }

    /// Digest tag exactly as given; blank tags count as none
    pub fn digest_tag(&self) -> Option<&str> {
        self.digest_tag
            .as_deref()
            .filter(|tag| !tag.trim().is_empty())
    }
}

/// A request to notify one user over one or more channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Optional sender override
    #[serde(default)]
    pub from: Option<String>,
    pub user_id: Uuid,
    /// Important notifications ignore the user's opt-out and digesting
    #[serde(default)]
    pub important: bool,
    /// Channel name to message
    #[serde(default)]
    pub messages: BTreeMap<String, ChannelMessage>,
}

impl NotificationRequest {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            from: None,
            user_id,
            important: false,
            messages: BTreeMap::new(),
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_message(mut self, channel: impl Into<String>, message: ChannelMessage) -> Self {
        self.messages.insert(channel.into(), message);
        self
    }

    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }

    /// True when at least one channel message has content
    pub fn has_content(&self) -> bool {
        self.messages.values().any(ChannelMessage::has_content)
    }

    /// Sender override, ignoring blank values
    pub fn sender_override(&self) -> Option<&str> {
        self.from
            .as_deref()
            .map(str::trim)
            .filter(|from| !from.is_empty())
    }

    /// Names of all channels in the request, in key order
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }
}
