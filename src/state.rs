//! Application state.
//!
//! Holds the channel registry, the digest queue and the services wired
//! against them, shared by every command that dispatches.

use std::sync::Arc;

use crate::config::Settings;
use crate::error::AppResult;
use crate::repositories::Repositories;
use crate::services::{ChannelHandlerRegistry, InMemoryDigestQueue, Services};

/// Cloning is cheap since the registry, queue and services use `Arc` internally.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub registry: Arc<ChannelHandlerRegistry>,
    /// Messages deferred into digests by this process
    pub digest_queue: Arc<InMemoryDigestQueue>,
}

impl AppState {
    /// Builds the production handlers from `settings` and wires the dispatcher
    /// against `repos`.
    ///
    /// # Example
    /// ```ignore
    /// let repos = DirectorySnapshot::from_path(path)?.into_repositories()?;
    /// let state = AppState::from_settings(&settings, repos)?;
    /// ```
    pub fn from_settings(settings: &Settings, repos: Repositories) -> AppResult<Self> {
        let registry = Arc::new(ChannelHandlerRegistry::from_settings(
            &settings.notifications,
        )?);
        Ok(Self::new(
            registry,
            repos,
            settings.notifications.default_sender.clone(),
        ))
    }

    pub fn new(
        registry: Arc<ChannelHandlerRegistry>,
        repos: Repositories,
        default_sender: impl Into<String>,
    ) -> Self {
        let digest_queue = Arc::new(InMemoryDigestQueue::new());
        let services = Services::new(
            registry.clone(),
            repos,
            default_sender,
            digest_queue.clone(),
        );
        Self {
            services,
            registry,
            digest_queue,
        }
    }
}
