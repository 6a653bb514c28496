//! Configuration validation logic
//!
//! Runs after deserialization so that a broken configuration stops the
//! process at startup instead of failing individual dispatches.

use validator::ValidateEmail;

use crate::config::error::ConfigError;
use crate::config::settings::{
    EmailSettings, FileSettings, LoggerSettings, NotificationSettings, Settings, SmsSettings,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Channels with a built-in handler
const KNOWN_CHANNELS: &[&str] = &["email", "sms"];

impl EmailSettings {
    /// # Validation Rules
    /// - SMTP host must not be empty and port must be non-zero
    /// - Username and password must be set together
    /// - `from`, when set, must be an email address
    /// - Timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smtp_host.trim().is_empty() {
            return Err(ConfigError::validation(
                "notifications.email.smtp_host",
                "SMTP host is required when the email channel is enabled.",
            ));
        }

        if self.smtp_port == 0 {
            return Err(ConfigError::validation(
                "notifications.email.smtp_port",
                "SMTP port must be between 1 and 65535.",
            ));
        }

        if self.username.is_some() != self.password.is_some() {
            return Err(ConfigError::validation(
                "notifications.email.username",
                "SMTP username and password must be configured together.",
            ));
        }

        if let Some(ref from) = self.from {
            if !from.validate_email() {
                return Err(ConfigError::ValidationError {
                    field: "notifications.email.from".to_string(),
                    message: format!("'{}' is not a valid email address.", from),
                });
            }
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "notifications.email.timeout_seconds",
                "Email timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl SmsSettings {
    /// # Validation Rules
    /// - Gateway URL must use http or https
    /// - Timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.gateway_url.trim();
        if url.is_empty() {
            return Err(ConfigError::validation(
                "notifications.sms.gateway_url",
                "SMS gateway URL is required when the sms channel is enabled.",
            ));
        }

        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::ValidationError {
                field: "notifications.sms.gateway_url".to_string(),
                message: format!("'{}' must use the http or https scheme.", url),
            });
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "notifications.sms.timeout_seconds",
                "SMS timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl NotificationSettings {
    /// Validates the channel list and the transport settings of every
    /// enabled channel. Disabled channels are not checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_sender.trim().is_empty() {
            return Err(ConfigError::validation(
                "notifications.default_sender",
                "A default sender is required.",
            ));
        }

        if self.channels.is_empty() {
            return Err(ConfigError::validation(
                "notifications.channels",
                "At least one channel must be enabled.",
            ));
        }

        if let Some(unknown) = self
            .channels
            .iter()
            .find(|c| !KNOWN_CHANNELS.contains(&c.as_str()))
        {
            return Err(ConfigError::ValidationError {
                field: "notifications.channels".to_string(),
                message: format!(
                    "Unknown channel '{}'. Valid channels are: {}",
                    unknown,
                    KNOWN_CHANNELS.join(", ")
                ),
            });
        }

        if self.is_enabled("email") {
            self.email.validate()?;
        }
        if self.is_enabled("sms") {
            self.sms.validate()?;
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// # Validation Rules
    /// - Level is one of trace, debug, info, warn, error, or a set of
    ///   `target=level` filter directives
    /// - File settings are valid
    /// - At least one output is enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        let is_directive = self.level.contains(['=', ',']);
        let level_ok = if is_directive {
            tracing_subscriber::EnvFilter::try_new(&self.level).is_ok()
        } else {
            VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str())
        };

        if !level_ok {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()?;

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Returns the first validation error encountered
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.notifications.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: Result<(), ConfigError>) -> String {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_settings_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_email_requires_host() {
        let email = EmailSettings {
            smtp_host: " ".to_string(),
            ..EmailSettings::default()
        };
        assert_eq!(field_of(email.validate()), "notifications.email.smtp_host");
    }

    #[test]
    fn test_email_credentials_must_pair() {
        let email = EmailSettings {
            username: Some("mailer".to_string()),
            ..EmailSettings::default()
        };
        assert_eq!(field_of(email.validate()), "notifications.email.username");
    }

    #[test]
    fn test_email_from_must_be_address() {
        let email = EmailSettings {
            from: Some("not-an-address".to_string()),
            ..EmailSettings::default()
        };
        assert_eq!(field_of(email.validate()), "notifications.email.from");
    }

    #[test]
    fn test_sms_checked_only_when_enabled() {
        let mut settings = NotificationSettings::default();
        assert!(settings.validate().is_ok());

        settings.channels.push("sms".to_string());
        assert_eq!(field_of(settings.validate()), "notifications.sms.gateway_url");

        settings.sms.gateway_url = "ftp://sms.example.org".to_string();
        assert_eq!(field_of(settings.validate()), "notifications.sms.gateway_url");

        settings.sms.gateway_url = "https://sms.example.org/send".to_string();
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_unknown_channel_rejected() {
        let settings = NotificationSettings {
            channels: vec!["email".to_string(), "pager".to_string()],
            ..NotificationSettings::default()
        };
        assert_eq!(field_of(settings.validate()), "notifications.channels");
    }

    #[test]
    fn test_empty_channel_list_rejected() {
        let settings = NotificationSettings {
            channels: Vec::new(),
            ..NotificationSettings::default()
        };
        assert_eq!(field_of(settings.validate()), "notifications.channels");
    }

    #[test]
    fn test_blank_default_sender_rejected() {
        let settings = NotificationSettings {
            default_sender: String::new(),
            ..NotificationSettings::default()
        };
        assert_eq!(field_of(settings.validate()), "notifications.default_sender");
    }

    #[test]
    fn test_logger_levels() {
        for level in ["trace", "DEBUG", "info", "warn", "error", "fusion_notify=debug,warn"] {
            let settings = LoggerSettings {
                level: level.to_string(),
                ..LoggerSettings::default()
            };
            assert!(settings.validate().is_ok(), "level {level}");
        }

        let settings = LoggerSettings {
            level: "verbose".to_string(),
            ..LoggerSettings::default()
        };
        assert_eq!(field_of(settings.validate()), "logger.level");
    }

    #[test]
    fn test_logger_invalid_format() {
        let mut settings = LoggerSettings::default();
        settings.file.format = "xml".to_string();
        assert_eq!(field_of(settings.validate()), "logger.file.format");
    }

    #[test]
    fn test_logger_file_enabled_empty_path() {
        let mut settings = LoggerSettings::default();
        settings.file.enabled = true;
        settings.file.path = String::new();
        assert_eq!(field_of(settings.validate()), "logger.file.path");
    }
}
