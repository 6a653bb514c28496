//! Repository layer for the lookups the dispatcher depends on.
//!
//! Each store is a trait so the dispatcher can be wired against any backing
//! engine; the in-memory implementations serve fixtures and tests.

mod contact_repo;
mod digest_repo;
mod snapshot;
mod user_status_repo;

pub use contact_repo::{ContactDirectory, InMemoryContactDirectory};
pub use digest_repo::{DigestConfigurationStore, InMemoryDigestConfigurationStore};
pub use snapshot::DirectorySnapshot;
pub use user_status_repo::{InMemoryUserDirectory, UserStatusProvider};

use std::sync::Arc;

/// Aggregates all stores for convenient access.
///
/// Cloning is cheap since every store sits behind an `Arc`.
#[derive(Clone)]
pub struct Repositories {
    pub contacts: Arc<dyn ContactDirectory>,
    pub users: Arc<dyn UserStatusProvider>,
    pub digests: Arc<dyn DigestConfigurationStore>,
}
