//! Core channel handler trait and types.
//!
//! One handler exists per channel (email, SMS, ...). The dispatcher picks the
//! handler by channel name, asks it whether the contact can be reached on
//! that channel, and hands it the resolved addresses and message.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::external::{MailError, SmsError};
use crate::models::{ChannelMessage, ContactRecord, DeliveryErrorKind};

/// Per-channel delivery failure.
///
/// Never aborts a dispatch: the dispatcher records it as that channel's
/// outcome and carries on with the remaining channels.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The transport could not hand the message over
    #[error("Transport failure: {detail}")]
    TransportFailure { detail: String },

    /// Sender or recipient address is malformed for the channel
    #[error("Invalid address: {detail}")]
    InvalidAddress { detail: String },
}

impl DeliveryError {
    pub fn transport(detail: impl Into<String>) -> Self {
        DeliveryError::TransportFailure {
            detail: detail.into(),
        }
    }

    pub fn invalid_address(detail: impl Into<String>) -> Self {
        DeliveryError::InvalidAddress {
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> DeliveryErrorKind {
        match self {
            DeliveryError::TransportFailure { .. } => DeliveryErrorKind::TransportFailure,
            DeliveryError::InvalidAddress { .. } => DeliveryErrorKind::InvalidAddress,
        }
    }
}

impl From<MailError> for DeliveryError {
    fn from(error: MailError) -> Self {
        match error {
            MailError::Address(_) => DeliveryError::invalid_address(error.to_string()),
            MailError::Transport(_) | MailError::Build(_) => {
                DeliveryError::transport(error.to_string())
            }
        }
    }
}

impl From<SmsError> for DeliveryError {
    fn from(error: SmsError) -> Self {
        DeliveryError::transport(error.to_string())
    }
}

/// Trait for channel handlers (email, SMS, etc.)
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// All handlers must be Send + Sync so one registry can serve concurrent
/// dispatches.
///
/// # Example Implementation
/// ```ignore
/// use async_trait::async_trait;
///
/// pub struct PushHandler {
///     transport: Arc<dyn PushTransport>,
/// }
///
/// #[async_trait]
/// impl ChannelHandler for PushHandler {
///     fn channel_name(&self) -> &'static str {
///         "push"
///     }
///
///     async fn deliver(
///         &self,
///         from: &str,
///         to: &str,
///         message: &ChannelMessage,
///     ) -> Result<(), DeliveryError> {
///         // Implementation here
///     }
/// }
/// ```
#[async_trait]
pub trait ChannelHandler: Send + Sync {
    /// Stable identifier, used as registry key and as key into contact
    /// records and request messages
    fn channel_name(&self) -> &'static str;

    /// Sender used when the request carries no override
    ///
    /// `None` falls back to the dispatcher-wide default sender.
    fn default_sender(&self) -> Option<&str> {
        None
    }

    /// True iff the contact has a non-empty, verified address for this channel
    fn is_eligible(&self, contact: &ContactRecord) -> bool {
        contact.verified_address_for(self.channel_name()).is_some()
    }

    /// Sends the message
    ///
    /// Recoverable transport problems are reported as [`DeliveryError`],
    /// never as panics.
    async fn deliver(
        &self,
        from: &str,
        to: &str,
        message: &ChannelMessage,
    ) -> Result<(), DeliveryError>;
}

/// Runs a transport call under a time budget
///
/// An expired budget is a transport failure like any other.
pub(crate) async fn with_timeout<F, E>(budget: Duration, call: F) -> Result<(), DeliveryError>
where
    F: Future<Output = Result<(), E>>,
    E: Into<DeliveryError>,
{
    match tokio::time::timeout(budget, call).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(DeliveryError::transport(format!(
            "timed out after {}s",
            budget.as_secs()
        ))),
    }
}
