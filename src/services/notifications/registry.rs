use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use super::email_handler::EmailHandler;
use super::handler::ChannelHandler;
use super::sms_handler::SmsHandler;
use crate::config::settings::NotificationSettings;
use crate::error::{AppError, AppResult};
use crate::external::{HttpSmsGateway, SmtpMailer};

/// Registry mapping channel names to their handlers
///
/// Built once at startup and shared read-only between dispatches.
#[derive(Default)]
pub struct ChannelHandlerRegistry {
    handlers: HashMap<String, Arc<dyn ChannelHandler>>,
}

impl ChannelHandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler under its own channel name
    ///
    /// Registering a second handler for the same channel replaces the first.
    pub fn register<H>(&mut self, handler: H) -> &mut Self
    where
        H: ChannelHandler + 'static,
    {
        self.register_arc(Arc::new(handler))
    }

    pub fn register_arc(&mut self, handler: Arc<dyn ChannelHandler>) -> &mut Self {
        self.handlers
            .insert(handler.channel_name().to_string(), handler);
        self
    }

    pub fn resolve(&self, channel: &str) -> Option<Arc<dyn ChannelHandler>> {
        self.handlers.get(channel).cloned()
    }

    pub fn channels(&self) -> BTreeSet<String> {
        self.handlers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Fails unless every listed channel has a handler
    pub fn require(&self, channels: &[&str]) -> AppResult<()> {
        let missing: Vec<&str> = channels
            .iter()
            .copied()
            .filter(|c| !self.handlers.contains_key(*c))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::configuration(
                "notifications.channels",
                format!("no handler registered for: {}", missing.join(", ")),
            ))
        }
    }

    /// Builds production handlers for every channel enabled in settings
    pub fn from_settings(settings: &NotificationSettings) -> AppResult<Self> {
        let mut registry = Self::new();

        for channel in &settings.channels {
            match channel.as_str() {
                EmailHandler::CHANNEL => {
                    let email = &settings.email;
                    let mailer = SmtpMailer::new(email).map_err(|e| AppError::Configuration {
                        key: "notifications.email".to_string(),
                        source: anyhow::Error::from(e),
                    })?;
                    registry.register(
                        EmailHandler::new(Arc::new(mailer))
                            .with_default_sender(email.from.clone())
                            .with_timeout(Duration::from_secs(email.timeout_seconds)),
                    );
                }
                SmsHandler::CHANNEL => {
                    let sms = &settings.sms;
                    let gateway =
                        HttpSmsGateway::new(sms).map_err(|e| AppError::Configuration {
                            key: "notifications.sms".to_string(),
                            source: anyhow::Error::from(e),
                        })?;
                    registry.register(
                        SmsHandler::new(Arc::new(gateway))
                            .with_sender_id(sms.sender_id.clone())
                            .with_timeout(Duration::from_secs(sms.timeout_seconds)),
                    );
                }
                other => {
                    return Err(AppError::configuration(
                        "notifications.channels",
                        format!("unknown channel '{}'", other),
                    ));
                }
            }
            tracing::debug!(channel = %channel, "channel handler registered");
        }

        if registry.is_empty() {
            return Err(AppError::configuration(
                "notifications.channels",
                "at least one channel must be enabled",
            ));
        }

        Ok(registry)
    }
}
