//! Wire-level send primitives for each channel.
//!
//! Channel handlers only see the transport traits; the concrete SMTP and
//! HTTP implementations live here.

mod client;
mod mailer;
mod sms_gateway;

pub use client::build_http_client;
pub use mailer::{MailError, MailTransport, OutgoingMail, SmtpMailer};
pub use sms_gateway::{HttpSmsGateway, OutgoingSms, SmsError, SmsTransport};
