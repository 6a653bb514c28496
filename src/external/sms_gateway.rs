//! SMS transport over an HTTP gateway.
//!
//! The gateway receives `{"from", "to", "body"}` as JSON and answers with a
//! 2xx status when the message was accepted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::json;

use super::client::build_http_client;
use crate::config::settings::SmsSettings;

/// Error type for SMS delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// The request could not be sent or timed out.
    #[error("SMS gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("SMS gateway rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The gateway URL is not usable.
    #[error("Invalid SMS gateway URL: {0}")]
    InvalidUrl(String),
}

/// A fully resolved SMS ready to hand to a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingSms {
    pub from: String,
    pub to: String,
    pub body: String,
}

/// Send primitive for the SMS channel
#[async_trait]
pub trait SmsTransport: Send + Sync {
    async fn send_sms(&self, sms: &OutgoingSms) -> Result<(), SmsError>;
}

/// [`SmsTransport`] posting to an HTTP gateway
pub struct HttpSmsGateway {
    client: reqwest::Client,
    url: Url,
    api_key: Option<String>,
}

impl HttpSmsGateway {
    pub fn new(settings: &SmsSettings) -> Result<Self, SmsError> {
        let url = Url::parse(&settings.gateway_url)
            .map_err(|e| SmsError::InvalidUrl(format!("{}: {}", settings.gateway_url, e)))?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(SmsError::InvalidUrl(
                "URL must use http or https protocol".to_string(),
            ));
        }

        let client = build_http_client(Duration::from_secs(settings.timeout_seconds))?;

        Ok(Self {
            client,
            url,
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl SmsTransport for HttpSmsGateway {
    async fn send_sms(&self, sms: &OutgoingSms) -> Result<(), SmsError> {
        let mut request = self.client.post(self.url.clone()).json(&json!({
            "from": sms.from,
            "to": sms.to,
            "body": sms.body,
        }));

        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(SmsError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
