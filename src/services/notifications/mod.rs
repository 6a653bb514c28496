//! Notification dispatch with pluggable channel handlers.
//!
//! [`NotificationDispatcher`] resolves the target user's contact details,
//! routes each channel message to the [`ChannelHandler`] registered for that
//! channel, and reports a [`DeliveryOutcome`](crate::models::DeliveryOutcome)
//! per channel. New channels are added by implementing `ChannelHandler` and
//! registering it in the [`ChannelHandlerRegistry`].

mod digest;
mod dispatcher;
mod email_handler;
mod handler;
mod registry;
mod sms_handler;

#[cfg(test)]
mod tests;

pub use digest::{DigestEntry, DigestQueue, InMemoryDigestQueue};
pub use dispatcher::NotificationDispatcher;
pub use email_handler::EmailHandler;
pub use handler::{ChannelHandler, DeliveryError};
pub use registry::ChannelHandlerRegistry;
pub use sms_handler::SmsHandler;
