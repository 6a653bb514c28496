//! Per-channel dispatch results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Why delivery over a channel was deliberately not attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ContactNotFound,
    NotificationsDisabled,
    UserInactive,
    MissingAddress,
    Unverified,
    /// Address is present and verified but the handler still declined it
    ChannelIneligible,
    EmptyContent,
}

/// Classification of a failed delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryErrorKind {
    TransportFailure,
    InvalidAddress,
}

/// Result of dispatching one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered,
    Skipped { reason: SkipReason },
    /// Handed to the digest queue instead of being sent now
    Digested { tag: String },
    Failed { error: DeliveryErrorKind, detail: String },
}

impl DeliveryOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        DeliveryOutcome::Skipped { reason }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, DeliveryOutcome::Skipped { .. })
    }

    pub fn is_digested(&self) -> bool {
        matches!(self, DeliveryOutcome::Digested { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DeliveryOutcome::Failed { .. })
    }

    /// Coarse label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryOutcome::Delivered => "delivered",
            DeliveryOutcome::Skipped { .. } => "skipped",
            DeliveryOutcome::Digested { .. } => "digested",
            DeliveryOutcome::Failed { .. } => "failed",
        }
    }
}

/// Outcomes of one dispatch keyed by channel name
pub type DeliveryReport = BTreeMap<String, DeliveryOutcome>;
