use thiserror::Error;

/// Reasons a notification request is rejected before anything is looked up
/// or delivered.
///
/// These are caller mistakes and map one-to-one onto stable error codes so
/// a boundary layer can translate them into protocol-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationKind {
    /// No channel message carries any content
    ContentRequired,
    /// The request names a channel with no registered handler
    UnsupportedChannel { channel: String },
}

impl std::fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationKind::ContentRequired => write!(f, "message content is required"),
            ValidationKind::UnsupportedChannel { channel } => {
                write!(f, "channel '{}' is not supported", channel)
            }
        }
    }
}

/// Application-wide error type that represents all possible errors in the system.
///
/// Skip conditions (opted-out users, missing or unverified contact details)
/// are never represented here; they surface as per-channel outcomes.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Unique constraint violation raised by a store
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
        /// Storage-level constraint name, used for message key lookup
        constraint: String,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Notification request rejected before dispatch
    #[error("Invalid notification request: {kind}")]
    InvalidRequest { kind: ValidationKind },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Shorthand for [`ValidationKind::ContentRequired`]
    pub fn content_required() -> Self {
        AppError::InvalidRequest {
            kind: ValidationKind::ContentRequired,
        }
    }

    /// Shorthand for [`ValidationKind::UnsupportedChannel`]
    pub fn unsupported_channel(channel: impl Into<String>) -> Self {
        AppError::InvalidRequest {
            kind: ValidationKind::UnsupportedChannel {
                channel: channel.into(),
            },
        }
    }

    /// Builds a configuration error from a key and a plain message
    pub fn configuration(key: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Configuration {
            key: key.into(),
            source: anyhow::anyhow!(message.into()),
        }
    }

    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Duplicate { .. } => "DUPLICATE",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::InvalidRequest { kind } => match kind {
                ValidationKind::ContentRequired => "CONTENT_REQUIRED",
                ValidationKind::UnsupportedChannel { .. } => "UNSUPPORTED_CHANNEL",
            },
            AppError::Configuration { .. } => "CONFIGURATION_ERROR",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Message key handed to the localization layer untouched
    ///
    /// Duplicates resolve through [`super::ConstraintMessageMap`] first; the
    /// key returned here is the fallback.
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "notification.error.notFound",
            AppError::Duplicate { .. } => "notification.error.constraint",
            AppError::Validation { .. } => "notification.error.validation",
            AppError::InvalidRequest { kind } => match kind {
                ValidationKind::ContentRequired => "notification.error.content.required",
                ValidationKind::UnsupportedChannel { .. } => {
                    "notification.error.channel.notSupported"
                }
            },
            AppError::Configuration { .. } => "notification.error.configuration",
            AppError::Internal { .. } => "notification.error.internal",
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<crate::config::error::ConfigError> for AppError {
    fn from(error: crate::config::error::ConfigError) -> Self {
        let key = match &error {
            crate::config::error::ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::new(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
