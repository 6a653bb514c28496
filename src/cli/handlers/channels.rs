//! Channels command handler

use std::collections::BTreeSet;

use crate::config::Settings;
use crate::error::AppResult;
use crate::services::ChannelHandlerRegistry;

pub struct ChannelsCommandHandler {
    config: Settings,
}

impl ChannelsCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Prints one registered channel per line
    pub async fn execute(&self) -> AppResult<()> {
        for channel in self.channels()? {
            println!("{}", channel);
        }
        Ok(())
    }

    pub fn channels(&self) -> AppResult<BTreeSet<String>> {
        let registry = ChannelHandlerRegistry::from_settings(&self.config.notifications)?;
        Ok(registry.channels())
    }
}
