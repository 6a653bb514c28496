//! Check command handler
//!
//! Validates configuration and builds every enabled channel handler without
//! dispatching anything.

use crate::config::Settings;
use crate::error::AppResult;
use crate::services::ChannelHandlerRegistry;

pub struct CheckCommandHandler {
    config: Settings,
}

impl CheckCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> AppResult<()> {
        self.config.validate()?;
        println!("✓ Configuration is valid");

        let registry = ChannelHandlerRegistry::from_settings(&self.config.notifications)?;
        for channel in registry.channels() {
            println!("✓ Channel '{}' handler built", channel);
        }
        println!(
            "✓ Default sender: {}",
            self.config.notifications.default_sender
        );

        println!("Check completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_relay() -> Settings {
        let mut config = Settings::default();
        config.notifications.email.starttls = false;
        config
    }

    #[tokio::test]
    async fn test_check_local_relay_config() {
        let handler = CheckCommandHandler::new(local_relay());
        assert!(handler.execute().await.is_ok());
        assert_eq!(handler.config(), &local_relay());
    }

    #[tokio::test]
    async fn test_check_rejects_invalid_config() {
        let mut config = local_relay();
        config.notifications.channels.push("sms".to_string());

        let err = CheckCommandHandler::new(config).execute().await.unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }
}
