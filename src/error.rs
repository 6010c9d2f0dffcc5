use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised while talking to an exchange REST API.
///
/// Every variant is soft from the scanner's point of view: a failed
/// instrument-list fetch keeps the previous registry, and a failed candle
/// fetch skips the instrument for the current cycle.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("exchange rejected request: {code} {message}")]
    Api { code: i64, message: String },

    #[error("malformed response: {reason} (payload: {context})")]
    Malformed { reason: String, context: String },
}

impl ExchangeError {
    /// Maximum number of payload characters kept as error context.
    pub const CONTEXT_LIMIT: usize = 256;

    /// Build a malformed-response error, truncating the payload context.
    pub fn malformed(reason: impl Into<String>, payload: &str) -> Self {
        let context: String = payload.chars().take(Self::CONTEXT_LIMIT).collect();
        Self::Malformed {
            reason: reason.into(),
            context,
        }
    }

    /// True when the exchange answered but the payload could not be used.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::Api { .. })
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err)
    }
}

/// Delivery failure on a single notification channel.
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("{channel} delivery failed: {reason}")]
    Delivery { channel: String, reason: String },

    #[error("{channel} delivery timed out after {timeout_ms}ms")]
    Timeout { channel: String, timeout_ms: u64 },

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error(transparent)]
    Notification(#[from] NotificationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
