//! SMS channel handler.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;

use super::handler::{ChannelHandler, DeliveryError, with_timeout};
use crate::external::{OutgoingSms, SmsTransport};
use crate::models::ChannelMessage;

/// E.164 phone number, optional leading `+`
static PHONE_NUMBER: OnceLock<Regex> = OnceLock::new();

fn phone_number_pattern() -> &'static Regex {
    PHONE_NUMBER.get_or_init(|| Regex::new(r"^\+?[1-9][0-9]{6,14}$").expect("phone pattern is valid"))
}

/// Delivers notifications as text messages.
///
/// Only the message body is sent; subjects are dropped.
pub struct SmsHandler {
    transport: Arc<dyn SmsTransport>,
    sender_id: Option<String>,
    timeout: Duration,
}

impl SmsHandler {
    pub const CHANNEL: &'static str = "sms";

    pub fn new(transport: Arc<dyn SmsTransport>) -> Self {
        Self {
            transport,
            sender_id: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_sender_id(mut self, sender_id: Option<String>) -> Self {
        self.sender_id = sender_id.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ChannelHandler for SmsHandler {
    fn channel_name(&self) -> &'static str {
        Self::CHANNEL
    }

    fn default_sender(&self) -> Option<&str> {
        self.sender_id.as_deref()
    }

    async fn deliver(
        &self,
        from: &str,
        to: &str,
        message: &ChannelMessage,
    ) -> Result<(), DeliveryError> {
        let number: String = to.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
        if !phone_number_pattern().is_match(&number) {
            return Err(DeliveryError::invalid_address(format!(
                "recipient '{}' is not a phone number",
                to
            )));
        }

        let sms = OutgoingSms {
            from: from.to_string(),
            to: number,
            body: message.body.clone(),
        };

        with_timeout(self.timeout, self.transport.send_sms(&sms)).await
    }
}
