//! Configuration error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration file is missing
    #[error("Required configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Sources were read but could not be mapped onto [`Settings`](super::Settings)
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A loaded value is out of range or malformed
    #[error("Validation error: {field} - {message}")]
    ValidationError { field: String, message: String },

    #[error(
        "Invalid environment '{value}'. Valid values are: development, test, staging, production"
    )]
    InvalidEnvironment { value: String },

    /// Two selectors that must not be combined were both set
    #[error("{first} and {second} cannot both be set")]
    MutuallyExclusive {
        first: &'static str,
        second: &'static str,
    },

    #[error("Configuration error: {0}")]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        ConfigError::FileNotFound { path: path.into() }
    }
}
