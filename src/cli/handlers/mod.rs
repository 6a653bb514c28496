//! Command handlers for CLI operations

pub mod channels;
pub mod check;
pub mod dispatch;

pub use channels::ChannelsCommandHandler;
pub use check::CheckCommandHandler;
pub use dispatch::DispatchCommandHandler;
