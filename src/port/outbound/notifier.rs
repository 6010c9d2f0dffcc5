//! Notifier port for alert delivery.
//!
//! This module defines the trait for delivering alerts to a single
//! notification channel (push relay, desktop toast, log).

use async_trait::async_trait;

use crate::domain::alert::Alert;
use crate::error::NotificationError;

/// A single notification channel.
///
/// Delivery is best effort: implementations report failure through the
/// returned error and never retry. The dispatcher isolates channels from
/// each other, so a slow or failing channel cannot hold up the rest.
#[async_trait]
pub trait AlertChannel: Send + Sync {
    /// Short channel name for logs (`push`, `desktop`, `log`).
    fn name(&self) -> &str;

    /// Deliver one alert.
    async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError>;
}
