//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; the push relay token is read from
//! the `PUSH_TOKEN` environment variable and never from the file.
//!
//! # Example
//!
//! ```no_run
//! use wickscan::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use super::schedule::{DedupConfig, ScheduleConfig};
use crate::adapter::outbound::exchange::settings::{ExchangeConfig, HttpConfig, SUPPORTED_INTERVALS};
use crate::adapter::outbound::notifier::settings::NotificationsConfig;
use crate::domain::id::ExchangeId;
use crate::domain::schedule::validate_bucket;
use crate::error::{ConfigError, Result};

/// Environment variable holding the push relay token.
pub const PUSH_TOKEN_ENV: &str = "PUSH_TOKEN";

/// Main application configuration.
///
/// Every section is optional. An empty file scans Binance on a five-minute
/// cadence and logs alerts.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scan cadence and fetch timeout.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Alert dedup window.
    #[serde(default)]
    pub dedup: DedupConfig,

    /// Shared HTTP client settings for exchange requests.
    #[serde(default)]
    pub http: HttpConfig,

    /// Exchanges to scan.
    #[serde(default = "default_exchanges")]
    pub exchanges: Vec<ExchangeConfig>,

    /// Alert channels.
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_exchanges() -> Vec<ExchangeConfig> {
    vec![ExchangeConfig::new(ExchangeId::Binance)]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            schedule: ScheduleConfig::default(),
            dedup: DedupConfig::default(),
            http: HttpConfig::default(),
            exchanges: default_exchanges(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Loads the push relay token from `PUSH_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.notifications.push.token = std::env::var(PUSH_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        validate_bucket(self.schedule.bucket_minutes).map_err(|err| ConfigError::InvalidValue {
            field: "bucket_minutes",
            reason: err.to_string(),
        })?;
        if self.schedule.fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        self.dedup
            .reset_schedule()
            .map_err(|err| ConfigError::InvalidValue {
                field: "reset_hours_utc",
                reason: err.to_string(),
            })?;

        if self.http.timeout_ms == 0 || self.http.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http",
                reason: "timeouts must be greater than 0".to_string(),
            }
            .into());
        }

        self.validate_exchanges()?;
        self.validate_notifications()?;
        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn validate_exchanges(&self) -> Result<()> {
        let mut kinds = HashSet::new();
        for exchange in self.enabled_exchanges() {
            if !kinds.insert(exchange.kind) {
                return Err(ConfigError::InvalidValue {
                    field: "exchanges",
                    reason: format!("{} is configured more than once", exchange.kind.as_str()),
                }
                .into());
            }
            if exchange.quote_asset.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "quote_asset",
                }
                .into());
            }
            if exchange.threshold_pct() < Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    field: "threshold_pct",
                    reason: "must be 0 or greater".to_string(),
                }
                .into());
            }
            let interval = exchange.interval_minutes();
            if !SUPPORTED_INTERVALS.contains(&interval) {
                return Err(ConfigError::InvalidValue {
                    field: "interval_minutes",
                    reason: format!("{interval} is not one of {SUPPORTED_INTERVALS:?}"),
                }
                .into());
            }
            if exchange.candle_limit < 2 {
                return Err(ConfigError::InvalidValue {
                    field: "candle_limit",
                    reason: "must be at least 2".to_string(),
                }
                .into());
            }
            validate_http_url("base_url", exchange.base_url())?;
        }

        if kinds.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "exchanges",
                reason: "at least one exchange must be enabled".to_string(),
            }
            .into());
        }
        Ok(())
    }

    #[allow(clippy::result_large_err)]
    fn validate_notifications(&self) -> Result<()> {
        let notifications = &self.notifications;
        if notifications.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notifications.timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if notifications.push.enabled {
            validate_http_url("notifications.push.url", &notifications.push.url)?;
            if notifications.push.token.is_none() {
                return Err(ConfigError::MissingField {
                    field: PUSH_TOKEN_ENV,
                }
                .into());
            }
        }
        if notifications.desktop.enabled && notifications.desktop.program.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "notifications.desktop.program",
            }
            .into());
        }
        Ok(())
    }

    /// Exchanges with `enabled = true`, in file order.
    pub fn enabled_exchanges(&self) -> impl Iterator<Item = &ExchangeConfig> {
        self.exchanges.iter().filter(|exchange| exchange.enabled)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[allow(clippy::result_large_err)]
fn validate_http_url(field: &'static str, raw: &str) -> Result<()> {
    let parsed = Url::parse(raw).map_err(|err| ConfigError::InvalidValue {
        field,
        reason: format!("'{raw}': {err}"),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("'{raw}' must use http or https"),
        }
        .into());
    }
    Ok(())
}
