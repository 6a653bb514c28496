//! Email channel handler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use validator::ValidateEmail;

use super::handler::{ChannelHandler, DeliveryError, with_timeout};
use crate::external::{MailTransport, OutgoingMail};
use crate::models::ChannelMessage;

/// Delivers notifications as plain-text email.
///
/// Eligibility is the trait default (verified, non-blank address). The
/// user's global opt-out is enforced by the dispatcher, which lets
/// important notifications through.
pub struct EmailHandler {
    transport: Arc<dyn MailTransport>,
    default_sender: Option<String>,
    timeout: Duration,
}

impl EmailHandler {
    pub const CHANNEL: &'static str = "email";

    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self {
            transport,
            default_sender: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_default_sender(mut self, sender: Option<String>) -> Self {
        self.default_sender = sender.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ChannelHandler for EmailHandler {
    fn channel_name(&self) -> &'static str {
        Self::CHANNEL
    }

    fn default_sender(&self) -> Option<&str> {
        self.default_sender.as_deref()
    }

    async fn deliver(
        &self,
        from: &str,
        to: &str,
        message: &ChannelMessage,
    ) -> Result<(), DeliveryError> {
        if !to.validate_email() {
            return Err(DeliveryError::invalid_address(format!(
                "recipient '{}' is not an email address",
                to
            )));
        }
        if !from.validate_email() {
            return Err(DeliveryError::invalid_address(format!(
                "sender '{}' is not an email address",
                from
            )));
        }

        let mail = OutgoingMail {
            from: from.to_string(),
            to: to.to_string(),
            subject: message.subject.clone().unwrap_or_default(),
            body: message.body.clone(),
        };

        with_timeout(self.timeout, self.transport.send_mail(&mail)).await
    }
}
