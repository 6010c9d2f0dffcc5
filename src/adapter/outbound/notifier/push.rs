//! Push relay channel (PushPlus-compatible `GET ?token&title&content`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::{debug, warn};

use super::settings::PushConfig;
use crate::domain::alert::Alert;
use crate::error::NotificationError;
use crate::port::outbound::notifier::AlertChannel;

const CHANNEL: &str = "push";

#[derive(Debug, Deserialize)]
struct RelayReply {
    code: i64,
    #[serde(default)]
    msg: String,
}

pub struct PushChannel {
    http: HttpClient,
    url: String,
    token: String,
}

impl PushChannel {
    #[must_use]
    pub fn new(http: HttpClient, url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            token: token.into(),
        }
    }

    /// Build from config. Returns `None` when no token is available.
    #[must_use]
    pub fn from_config(config: &PushConfig, timeout: Duration) -> Option<Self> {
        let token = config.token.clone()?;
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build push HTTP client, using defaults");
                HttpClient::new()
            });
        Some(Self::new(http, config.url.clone(), token))
    }
}

#[async_trait]
impl AlertChannel for PushChannel {
    fn name(&self) -> &str {
        CHANNEL
    }

    async fn deliver(&self, alert: &Alert) -> Result<(), NotificationError> {
        let failed = |reason: String| NotificationError::Delivery {
            channel: CHANNEL.into(),
            reason,
        };

        let query = [
            ("token", self.token.as_str()),
            ("title", alert.title.as_str()),
            ("content", alert.body.as_str()),
        ];
        let response = self
            .http
            .get(&self.url)
            .query(&query)
            .send()
            .await
            .map_err(|err| failed(err.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|err| failed(err.to_string()))?;
        if !status.is_success() {
            return Err(failed(format!("HTTP {status}")));
        }
        check_reply(&body).map_err(failed)?;

        debug!(title = %alert.title, "Push relay accepted alert");
        Ok(())
    }
}

/// Relays answer 200 at the HTTP layer and report failure in the JSON body.
/// Bodies that are not JSON are taken as accepted.
pub(crate) fn check_reply(body: &str) -> Result<(), String> {
    match serde_json::from_str::<RelayReply>(body) {
        Ok(reply) if reply.code != 200 => Err(format!("relay code {}: {}", reply.code, reply.msg)),
        _ => Ok(()),
    }
}
