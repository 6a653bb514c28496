//! Service layer.
//!
//! Services coordinate the repositories with the channel handlers.

pub mod notifications;

pub use notifications::{
    ChannelHandlerRegistry, DigestQueue, InMemoryDigestQueue, NotificationDispatcher,
};

use std::sync::Arc;

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since everything inside sits behind an `Arc`.
#[derive(Clone)]
pub struct Services {
    pub notifications: NotificationDispatcher,
}

impl Services {
    pub fn new(
        registry: Arc<ChannelHandlerRegistry>,
        repos: Repositories,
        default_sender: impl Into<String>,
        digest_queue: Arc<dyn DigestQueue>,
    ) -> Self {
        Self {
            notifications: NotificationDispatcher::new(registry, repos, default_sender)
                .with_digest_queue(digest_queue),
        }
    }
}
