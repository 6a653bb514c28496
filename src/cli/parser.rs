//! CLI argument parsing with clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::validation::{validate_config_file_path, validate_json_file_path};

/// Notification dispatch for the fusion platform
#[derive(Parser, Debug)]
#[command(name = "fusion-notify")]
#[command(about = "Dispatch notifications to users over their verified channels")]
#[command(long_about = "
fusion-notify resolves a user's contact details, checks which channels may be
used, and hands each channel message to the matching channel handler.

EXAMPLES:
    # Dispatch a request against a directory fixture
    fusion-notify dispatch --directory fixtures/directory.json --request fixtures/request.json

    # List the channels built from configuration
    fusion-notify channels

    # Validate configuration and channel transports
    fusion-notify --env production check

    # Use a single configuration file
    fusion-notify --config /etc/fusion-notify/notify.toml check
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Loads only this TOML file instead of the layered files under
    /// `config/`. `NOTIFY_*` environment variables still apply.
    #[arg(short, long, value_name = "FILE", value_parser = validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection (`NOTIFY_APP_ENV`)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Dispatch one notification request and print the delivery report
    ///
    /// The directory fixture is a JSON document with `contacts`, `users` and
    /// `digest_configurations` arrays. The request is a JSON notification
    /// request. Requests rejected before dispatch exit with a non-zero code.
    Dispatch {
        /// Directory fixture (JSON)
        #[arg(long, value_name = "FILE", value_parser = validate_json_file_path)]
        directory: PathBuf,

        /// Notification request (JSON)
        #[arg(long, value_name = "FILE", value_parser = validate_json_file_path)]
        request: PathBuf,
    },
    /// List the channels with a registered handler
    Channels,
    /// Validate configuration and build every channel handler (default)
    Check,
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

impl Cli {
    /// Level forced by `--verbose` or `--quiet`
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}
