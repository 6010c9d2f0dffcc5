//! Per-exchange REST configuration.

use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::domain::id::ExchangeId;

/// Bar intervals every supported exchange accepts.
pub const SUPPORTED_INTERVALS: [u32; 6] = [1, 3, 5, 15, 30, 60];

/// One `[[exchanges]]` entry.
///
/// Everything except `kind` is optional; missing values fall back to the
/// venue defaults returned by the accessor methods.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Which venue this entry configures.
    pub kind: ExchangeId,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// REST base URL override.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Quote asset used to filter the instrument list.
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,
    /// Minimum magnitude, in percent, for a signal.
    #[serde(default)]
    pub threshold_pct: Option<Decimal>,
    /// Bar interval in minutes.
    #[serde(default)]
    pub interval_minutes: Option<u32>,
    /// Delay between fetch submissions in milliseconds.
    #[serde(default)]
    pub pacing_ms: Option<u64>,
    /// Symbols never scanned.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    /// Number of bars requested per fetch.
    #[serde(default = "default_candle_limit")]
    pub candle_limit: u32,
}

const fn default_enabled() -> bool {
    true
}

fn default_quote_asset() -> String {
    "USDT".into()
}

const fn default_candle_limit() -> u32 {
    2
}

const fn default_interval_minutes() -> u32 {
    5
}

impl ExchangeConfig {
    /// Venue defaults for `kind`.
    #[must_use]
    pub fn new(kind: ExchangeId) -> Self {
        Self {
            kind,
            enabled: default_enabled(),
            base_url: None,
            quote_asset: default_quote_asset(),
            threshold_pct: None,
            interval_minutes: None,
            pacing_ms: None,
            exclude: None,
            candle_limit: default_candle_limit(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(match self.kind {
                ExchangeId::Binance => "https://fapi.binance.com",
                ExchangeId::Bybit => "https://api.bybit.com",
                ExchangeId::Gateio => "https://api.gateio.ws",
            })
            .trim_end_matches('/')
    }

    #[must_use]
    pub fn threshold_pct(&self) -> Decimal {
        self.threshold_pct.unwrap_or(match self.kind {
            ExchangeId::Binance => dec!(7),
            ExchangeId::Bybit | ExchangeId::Gateio => dec!(8),
        })
    }

    #[must_use]
    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes.unwrap_or(default_interval_minutes())
    }

    /// Delay between two fetch submissions. Gate.io is paced by default.
    #[must_use]
    pub fn pacing(&self) -> Duration {
        let ms = self.pacing_ms.unwrap_or(match self.kind {
            ExchangeId::Gateio => 60,
            ExchangeId::Binance | ExchangeId::Bybit => 0,
        });
        Duration::from_millis(ms)
    }

    #[must_use]
    pub fn exclude(&self) -> Vec<String> {
        match (&self.exclude, self.kind) {
            (Some(list), _) => list.clone(),
            (None, ExchangeId::Binance) => vec!["BTCSTUSDT".into()],
            (None, _) => Vec::new(),
        }
    }
}

/// Shared HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    10_000
}

const fn default_http_connect_timeout_ms() -> u64 {
    5000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
        }
    }
}
