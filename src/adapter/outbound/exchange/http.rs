//! Shared HTTP plumbing for the exchange adapters.
//!
//! Bodies are read as text first so a payload that fails to decode can be
//! attached to the error as context.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::settings::HttpConfig;
use crate::domain::candle::Candle;
use crate::error::ExchangeError;

/// Build the client shared by every adapter.
#[must_use]
pub fn build_client(config: &HttpConfig) -> HttpClient {
    HttpClient::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
        .user_agent(concat!("wickscan/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|err| {
            warn!(error = %err, "Failed to build HTTP client, using defaults");
            HttpClient::new()
        })
}

/// GET `url` and return the body of a successful response.
pub(crate) async fn get_text(
    http: &HttpClient,
    url: &str,
    query: &[(&str, String)],
) -> Result<String, ExchangeError> {
    debug!(url, "GET");
    let response = http.get(url).query(query).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ExchangeError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.text().await?)
}

/// Decode a JSON body, keeping the payload as context on failure.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ExchangeError> {
    serde_json::from_str(body).map_err(|err| ExchangeError::malformed(err.to_string(), body))
}

pub(crate) fn price(field: &str, raw: &str, body: &str) -> Result<Decimal, ExchangeError> {
    Decimal::from_str(raw.trim())
        .map_err(|err| ExchangeError::malformed(format!("bad {field} '{raw}': {err}"), body))
}

pub(crate) fn millis(field: &str, ms: i64, body: &str) -> Result<DateTime<Utc>, ExchangeError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| ExchangeError::malformed(format!("{field} out of range: {ms}"), body))
}

pub(crate) fn seconds(field: &str, secs: i64, body: &str) -> Result<DateTime<Utc>, ExchangeError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| ExchangeError::malformed(format!("{field} out of range: {secs}"), body))
}

/// Sort bars oldest first and require at least two of them.
pub(crate) fn chronological(mut bars: Vec<Candle>, body: &str) -> Result<Vec<Candle>, ExchangeError> {
    if bars.len() < 2 {
        return Err(ExchangeError::malformed(
            format!("insufficient bars: got {}", bars.len()),
            body,
        ));
    }
    bars.sort_by_key(Candle::open_time);
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn price_parses_exchange_decimal_strings() {
        assert_eq!(price("open", "0.00001234", "").unwrap(), dec!(0.00001234));
        assert_eq!(price("open", " 42 ", "").unwrap(), dec!(42));
    }

    #[test]
    fn bad_price_is_malformed_with_context() {
        let err = price("high", "n/a", "{\"h\":\"n/a\"}").unwrap_err();
        match err {
            ExchangeError::Malformed { reason, context } => {
                assert!(reason.contains("high"));
                assert_eq!(context, "{\"h\":\"n/a\"}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decode_failure_is_malformed() {
        let err = decode::<Vec<u32>>("<html>busy</html>").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn epoch_helpers() {
        assert_eq!(
            millis("t", 1_700_000_000_000, "").unwrap(),
            seconds("t", 1_700_000_000, "").unwrap()
        );
    }
}
