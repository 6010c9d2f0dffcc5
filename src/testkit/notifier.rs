//! Alert channel that records deliveries.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::alert::Alert;
use crate::error::NotificationError;
use crate::port::outbound::notifier::AlertChannel;

/// Thread-safe alert collector for dispatch assertions.
///
/// A failing channel still records the alert it was handed, then reports
/// a delivery error.
pub struct RecordingChannel {
    name: String,
    alerts: Mutex<Vec<Alert>>,
    fail: bool,
    delay: Option<Duration>,
}

impl RecordingChannel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alerts: Mutex::new(Vec::new()),
            fail: false,
            delay: None,
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(name)
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.lock().is_empty()
    }
}

#[async_trait]
impl AlertChannel for RecordingChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.alerts.lock().push(alert.clone());
        if self.fail {
            return Err(NotificationError::Delivery {
                channel: self.name.clone(),
                reason: "scripted failure".into(),
            });
        }
        Ok(())
    }
}
