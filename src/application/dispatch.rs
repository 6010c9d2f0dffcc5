//! Fan-out of alerts to every registered channel.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::domain::alert::Alert;
use crate::domain::scan::ScanCycle;
use crate::error::NotificationError;
use crate::port::outbound::notifier::AlertChannel;

/// Result of delivering one alert on one channel.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub channel: String,
    pub result: Result<(), NotificationError>,
}

impl ChannelOutcome {
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        self.result.is_ok()
    }
}

/// Registry of alert channels.
///
/// Channels run concurrently, each bounded by its own timeout. A failing or
/// hung channel is logged and reported in its outcome; it never affects the
/// other channels or the caller.
pub struct NotificationDispatcher {
    channels: Vec<Arc<dyn AlertChannel>>,
    timeout: Duration,
}

impl NotificationDispatcher {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            channels: Vec::new(),
            timeout,
        }
    }

    pub fn register(&mut self, channel: Arc<dyn AlertChannel>) {
        self.channels.push(channel);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    #[must_use]
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Deliver one alert on every channel.
    pub async fn dispatch(&self, alert: &Alert) -> Vec<ChannelOutcome> {
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        let deliveries = self.channels.iter().map(|channel| async move {
            let name = channel.name().to_string();
            let result = match tokio::time::timeout(self.timeout, channel.deliver(alert)).await {
                Ok(result) => result,
                Err(_) => Err(NotificationError::Timeout {
                    channel: name.clone(),
                    timeout_ms,
                }),
            };
            match &result {
                Ok(()) => debug!(channel = %name, title = %alert.title, "Alert delivered"),
                Err(err) => warn!(channel = %name, title = %alert.title, error = %err, "Alert delivery failed"),
            }
            ChannelOutcome {
                channel: name,
                result,
            }
        });
        join_all(deliveries).await
    }

    /// Deliver a cycle's alert batch (new listings first, then volatility).
    pub async fn publish(&self, cycle: &ScanCycle) -> Vec<ChannelOutcome> {
        let mut outcomes = Vec::new();
        for alert in cycle.alert_batch() {
            outcomes.extend(self.dispatch(&alert).await);
        }
        outcomes
    }
}
