//! Channel that emits alerts as structured log events.

use async_trait::async_trait;
use tracing::info;

use crate::domain::alert::Alert;
use crate::error::NotificationError;
use crate::port::outbound::notifier::AlertChannel;

pub struct LogChannel;

#[async_trait]
impl AlertChannel for LogChannel {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError> {
        info!(
            kind = ?alert.kind,
            title = %alert.title,
            body = %alert.body,
            "Alert"
        );
        Ok(())
    }
}
