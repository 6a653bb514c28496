use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::AppError;

/// Translates storage constraint names into user-facing message keys.
///
/// The table belongs to the boundary layer: stores report which constraint
/// they tripped, and only code that renders errors consults this map.
#[derive(Debug, Clone)]
pub struct ConstraintMessageMap {
    entries: HashMap<String, String>,
}

/// Matches `constraint "name"` inside a raw storage error message
static CONSTRAINT_NAME: OnceLock<Regex> = OnceLock::new();

fn constraint_name_pattern() -> &'static Regex {
    CONSTRAINT_NAME.get_or_init(|| {
        Regex::new(r#"constraint "([^"]+)""#).expect("constraint pattern is valid")
    })
}

impl ConstraintMessageMap {
    /// Creates an empty map
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds or replaces the message key for a constraint
    pub fn insert(&mut self, constraint: impl Into<String>, message_key: impl Into<String>) -> &mut Self {
        self.entries.insert(constraint.into(), message_key.into());
        self
    }

    /// Looks up the message key for a constraint name
    pub fn resolve(&self, constraint: &str) -> Option<&str> {
        self.entries.get(constraint).map(String::as_str)
    }

    /// Pulls the constraint name out of a raw storage error message
    ///
    /// ```
    /// use fusion_notify::error::ConstraintMessageMap;
    ///
    /// let message = "duplicate key value violates unique constraint \"unq_contact_details_email\"";
    /// assert_eq!(
    ///     ConstraintMessageMap::extract_constraint(message),
    ///     Some("unq_contact_details_email".to_string())
    /// );
    /// ```
    pub fn extract_constraint(message: &str) -> Option<String> {
        constraint_name_pattern()
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Resolves a raw storage message, falling back to `None` when the
    /// constraint is unknown or absent
    pub fn resolve_message(&self, message: &str) -> Option<&str> {
        Self::extract_constraint(message).and_then(|name| self.resolve(&name))
    }

    /// Message key for any application error
    pub fn message_key_for(&self, error: &AppError) -> String {
        match error {
            AppError::Duplicate { constraint, .. } => self
                .resolve(constraint)
                .unwrap_or_else(|| error.message_key())
                .to_string(),
            _ => error.message_key().to_string(),
        }
    }
}

impl Default for ConstraintMessageMap {
    fn default() -> Self {
        let mut map = Self::empty();
        map.insert(
            "unq_contact_details_email",
            "notification.error.userContactDetails.email.duplicated",
        )
        .insert(
            "unq_email_verification_tokens_emailaddress",
            "notification.error.verification.email.duplicated",
        )
        .insert(
            "unq_notification_messages_notificationid_channel",
            "notification.error.notification.channel.duplicated",
        )
        .insert(
            "unq_digest_configurations_tag",
            "notification.error.digestConfiguration.tag.duplicated",
        );
        map
    }
}
