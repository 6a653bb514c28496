//! Domain models for notification dispatch.

mod contact;
mod digest;
mod notification;
mod outcome;
mod user;

pub use contact::{ChannelAddress, ContactRecord};
pub use digest::{DigestConfiguration, DigestSchedule};
pub use notification::{ChannelMessage, NotificationRequest};
pub use outcome::{DeliveryErrorKind, DeliveryOutcome, DeliveryReport, SkipReason};
pub use user::UserStatus;
