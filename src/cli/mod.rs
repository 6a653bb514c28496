//! CLI module for fusion-notify
//!
//! Argument parsing, configuration merging and command execution.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment};

use anyhow::Context;

use crate::config::Settings;
use crate::error::{AppError, ConstraintMessageMap};
use crate::logger::{LogLevelHandle, init_logger};

/// Loads configuration the way `cli` selects it and applies CLI overrides
///
/// # Errors
/// Returns error if loading, merging or validation fails
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let merger = ConfigurationMerger::from_cli(cli).context("Configuration error")?;

    merger
        .merge_cli_args(cli)
        .context("Configuration merge error")
}

/// Initializes the global logger from the `[logger]` section
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<LogLevelHandle> {
    let logger_config = settings
        .logger
        .clone()
        .into_logger_config()
        .context("Logger configuration error")?;

    init_logger(logger_config).context("Logger initialization error")
}

/// Message key shown for a failed command
///
/// Duplicate errors are mapped through the constraint table so callers see
/// the domain key rather than the generic one.
pub fn error_message_key(error: &AppError) -> String {
    ConstraintMessageMap::default().message_key_for(error)
}
