//! Command executor for dispatching CLI commands

use super::handlers::{ChannelsCommandHandler, CheckCommandHandler, DispatchCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;

/// Runs the parsed command; no subcommand means `check`
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match &cli.command {
        Some(Commands::Dispatch { directory, request }) => {
            DispatchCommandHandler::new(settings)
                .execute(directory, request)
                .await
        }
        Some(Commands::Channels) => ChannelsCommandHandler::new(settings).execute().await,
        Some(Commands::Check) | None => CheckCommandHandler::new(settings).execute().await,
    }
}
