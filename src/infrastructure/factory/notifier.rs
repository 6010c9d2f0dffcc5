//! Alert channel factory.
//!
//! Builds the dispatcher with every configured channel (log, push relay,
//! desktop).

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::notifier::{
    DesktopChannel, LogChannel, NotificationsConfig, PushChannel,
};
use crate::application::dispatch::NotificationDispatcher;
use crate::infrastructure::config::settings::PUSH_TOKEN_ENV;

/// Build the notification dispatcher from configuration.
///
/// A push channel without a token is skipped with a warning rather than
/// failing startup; validation already rejects that combination for
/// configs loaded from disk.
#[must_use]
pub fn build_dispatcher(config: &NotificationsConfig) -> NotificationDispatcher {
    let mut dispatcher = NotificationDispatcher::new(config.timeout());

    if config.log.enabled {
        dispatcher.register(Arc::new(LogChannel));
    }

    if config.push.enabled {
        match PushChannel::from_config(&config.push, config.timeout()) {
            Some(channel) => dispatcher.register(Arc::new(channel)),
            None => warn!(env = PUSH_TOKEN_ENV, "Push channel enabled but token not set"),
        }
    }

    if config.desktop.enabled {
        dispatcher.register(Arc::new(DesktopChannel::from_config(&config.desktop)));
    }

    info!(channels = ?dispatcher.channel_names(), "Notification channels initialized");
    dispatcher
}
