//! Orchestrates one notification request across its channels.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;
use jiff::Timestamp;

use super::digest::{DigestEntry, DigestQueue};
use super::handler::ChannelHandler;
use super::registry::ChannelHandlerRegistry;
use crate::error::{AppError, AppResult};
use crate::models::{
    ChannelMessage, ContactRecord, DeliveryErrorKind, DeliveryOutcome, DeliveryReport,
    DigestConfiguration, NotificationRequest, SkipReason,
};
use crate::repositories::{
    ContactDirectory, DigestConfigurationStore, Repositories, UserStatusProvider,
};

/// Result of the per-user checks done once per dispatch
enum ContactGate {
    Open(ContactRecord),
    Closed(SkipReason),
}

/// A channel of the request paired with the handler that serves it
struct RoutedMessage<'a> {
    channel: &'a str,
    handler: Arc<dyn ChannelHandler>,
    message: &'a ChannelMessage,
}

/// Routes notification requests to channel handlers
///
/// Holds no per-dispatch state, so one instance serves any number of
/// concurrent dispatches.
#[derive(Clone)]
pub struct NotificationDispatcher {
    registry: Arc<ChannelHandlerRegistry>,
    contacts: Arc<dyn ContactDirectory>,
    users: Arc<dyn UserStatusProvider>,
    digests: Arc<dyn DigestConfigurationStore>,
    digest_queue: Option<Arc<dyn DigestQueue>>,
    default_sender: String,
}

impl NotificationDispatcher {
    pub fn new(
        registry: Arc<ChannelHandlerRegistry>,
        repositories: Repositories,
        default_sender: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            contacts: repositories.contacts,
            users: repositories.users,
            digests: repositories.digests,
            digest_queue: None,
            default_sender: default_sender.into(),
        }
    }

    /// Enables digesting; without a queue every message is sent immediately
    pub fn with_digest_queue(mut self, queue: Arc<dyn DigestQueue>) -> Self {
        self.digest_queue = Some(queue);
        self
    }

    pub fn list_registered_channels(&self) -> BTreeSet<String> {
        self.registry.channels()
    }

    /// Dispatches one request and reports an outcome per requested channel
    ///
    /// # Errors
    /// - `ContentRequired` when no channel message has a non-blank body;
    ///   nothing is looked up.
    /// - `UnsupportedChannel` when any channel has no registered handler;
    ///   nothing is delivered.
    /// - Store failures during the contact or user lookups.
    ///
    /// Opted-out, inactive or unknown users are not errors: every channel is
    /// reported as skipped.
    #[tracing::instrument(skip_all, fields(user_id = %request.user_id))]
    pub async fn dispatch(&self, request: &NotificationRequest) -> AppResult<DeliveryReport> {
        if !request.has_content() {
            return Err(AppError::content_required());
        }

        let routed = self.route(request)?;

        let contact = match self.open_gate(request).await? {
            ContactGate::Open(contact) => contact,
            ContactGate::Closed(reason) => {
                tracing::info!(?reason, "notification skipped for all channels");
                return Ok(routed
                    .iter()
                    .map(|r| (r.channel.to_string(), DeliveryOutcome::skipped(reason)))
                    .collect());
            }
        };

        let outcomes = join_all(
            routed
                .iter()
                .map(|r| self.dispatch_channel(request, &contact, r)),
        )
        .await;

        Ok(routed
            .iter()
            .map(|r| r.channel.to_string())
            .zip(outcomes)
            .collect())
    }

    fn route<'a>(&self, request: &'a NotificationRequest) -> AppResult<Vec<RoutedMessage<'a>>> {
        request
            .messages
            .iter()
            .map(|(channel, message)| {
                let handler = self
                    .registry
                    .resolve(channel)
                    .ok_or_else(|| AppError::unsupported_channel(channel.as_str()))?;
                Ok(RoutedMessage {
                    channel: channel.as_str(),
                    handler,
                    message,
                })
            })
            .collect()
    }

    async fn open_gate(&self, request: &NotificationRequest) -> AppResult<ContactGate> {
        let Some(contact) = self.contacts.find_by_user_id(request.user_id).await? else {
            return Ok(ContactGate::Closed(SkipReason::ContactNotFound));
        };

        if !self.users.is_active(request.user_id).await? {
            return Ok(ContactGate::Closed(SkipReason::UserInactive));
        }

        // important notifications ignore the opt-out
        if !contact.allow_notifications && !request.important {
            return Ok(ContactGate::Closed(SkipReason::NotificationsDisabled));
        }

        Ok(ContactGate::Open(contact))
    }

    async fn dispatch_channel(
        &self,
        request: &NotificationRequest,
        contact: &ContactRecord,
        routed: &RoutedMessage<'_>,
    ) -> DeliveryOutcome {
        let channel = routed.channel;
        let handler = routed.handler.as_ref();
        let message = routed.message;

        if !message.has_content() {
            return DeliveryOutcome::skipped(SkipReason::EmptyContent);
        }

        if !handler.is_eligible(contact) {
            let reason = contact.ineligibility_reason(channel);
            tracing::debug!(channel, ?reason, "channel skipped");
            return DeliveryOutcome::skipped(reason);
        }

        let Some(to) = contact.address_for(channel).map(|a| a.address.as_str()) else {
            return DeliveryOutcome::skipped(SkipReason::MissingAddress);
        };

        let from = request
            .sender_override()
            .or(handler.default_sender())
            .unwrap_or(&self.default_sender);

        if !request.important {
            if let Some(outcome) = self.try_digest(request, channel, from, to, message).await {
                return outcome;
            }
        }

        let outcome = match handler.deliver(from, to, message).await {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(e) => DeliveryOutcome::Failed {
                error: e.kind(),
                detail: e.to_string(),
            },
        };

        match &outcome {
            DeliveryOutcome::Failed { error, detail } => {
                tracing::warn!(channel, ?error, detail = %detail, "delivery failed");
            }
            _ => tracing::info!(channel, "notification delivered"),
        }

        outcome
    }

    /// Queues the message when its tag names a batching configuration
    ///
    /// Returns `None` when the message should be sent now.
    async fn try_digest(
        &self,
        request: &NotificationRequest,
        channel: &str,
        from: &str,
        to: &str,
        message: &ChannelMessage,
    ) -> Option<DeliveryOutcome> {
        let queue = self.digest_queue.as_ref()?;
        let tag = message.digest_tag()?;
        let configuration = self.digest_configuration(tag).await?;

        let entry = DigestEntry {
            user_id: request.user_id,
            channel: channel.to_string(),
            to: to.to_string(),
            from: from.to_string(),
            message: message.clone(),
            configuration,
            queued_at: Timestamp::now(),
        };

        let outcome = match queue.enqueue(entry).await {
            Ok(()) => {
                tracing::info!(channel, tag, "notification queued for digest");
                DeliveryOutcome::Digested {
                    tag: tag.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(channel, tag, error = %e, "digest enqueue failed");
                DeliveryOutcome::Failed {
                    error: DeliveryErrorKind::TransportFailure,
                    detail: e.to_string(),
                }
            }
        };
        Some(outcome)
    }

    /// Batching configuration for `tag`, if one exists and is usable
    async fn digest_configuration(&self, tag: &str) -> Option<DigestConfiguration> {
        match self.digests.find_by_tag(tag).await {
            Ok(Some(configuration)) if configuration.defers_delivery() => Some(configuration),
            Ok(Some(configuration)) => {
                if !configuration.is_usable() {
                    tracing::warn!(tag, "unusable digest configuration ignored");
                }
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(tag, error = %e, "digest configuration lookup failed, sending now");
                None
            }
        }
    }
}
