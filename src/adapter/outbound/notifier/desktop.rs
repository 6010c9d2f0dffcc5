//! Desktop toast channel.
//!
//! Shells out to a notifier program (`notify-send` by default) so no
//! platform toast library is linked in.

use async_trait::async_trait;
use tokio::process::Command;

use super::settings::DesktopConfig;
use crate::domain::alert::Alert;
use crate::error::NotificationError;
use crate::port::outbound::notifier::AlertChannel;

const CHANNEL: &str = "desktop";

pub struct DesktopChannel {
    program: String,
    args: Vec<String>,
    duration_secs: u64,
}

impl DesktopChannel {
    #[must_use]
    pub fn from_config(config: &DesktopConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            duration_secs: config.duration_secs,
        }
    }

    fn render_args(&self, alert: &Alert) -> Vec<String> {
        let duration_ms = (self.duration_secs * 1000).to_string();
        let duration_secs = self.duration_secs.to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{title}", &alert.title)
                    .replace("{message}", &alert.body)
                    .replace("{duration_ms}", &duration_ms)
                    .replace("{duration_secs}", &duration_secs)
            })
            .collect()
    }
}

#[async_trait]
impl AlertChannel for DesktopChannel {
    fn name(&self) -> &str {
        CHANNEL
    }

    async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError> {
        let output = Command::new(&self.program)
            .args(self.render_args(alert))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| NotificationError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(NotificationError::Delivery {
                channel: CHANNEL.into(),
                reason: format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            })
        }
    }
}
