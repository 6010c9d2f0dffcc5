//! Notification adapters.
//!
//! Implements [`AlertChannel`](crate::port::AlertChannel) for the push relay,
//! desktop toasts, and the log.

pub mod desktop;
pub mod log;
pub mod push;
pub mod settings;

pub use desktop::DesktopChannel;
pub use log::LogChannel;
pub use push::PushChannel;
pub use settings::{DesktopConfig, LogChannelConfig, NotificationsConfig, PushConfig};
