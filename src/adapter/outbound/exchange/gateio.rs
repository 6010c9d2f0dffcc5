//! Gate.io USDT-settled futures adapter.
//!
//! Candlesticks are objects keyed by single letters with a second-resolution
//! start time `t`; the close time is `t` plus the interval.

use async_trait::async_trait;
use chrono::Duration;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::Number;

use super::http::{chronological, decode, get_text, price, seconds};
use super::settings::ExchangeConfig;
use crate::domain::candle::{Candle, Ohlc};
use crate::domain::id::{ExchangeId, Instrument};
use crate::error::ExchangeError;
use crate::port::outbound::exchange::ExchangeAdapter;

#[derive(Debug, Deserialize)]
struct Contract {
    name: String,
    #[serde(default)]
    in_delisting: bool,
}

/// Prices come back as strings on current API versions and as bare numbers
/// on some older ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Quoted {
    Text(String),
    Number(Number),
}

impl Quoted {
    fn to_decimal(&self, field: &str, body: &str) -> Result<rust_decimal::Decimal, ExchangeError> {
        match self {
            Self::Text(raw) => price(field, raw, body),
            Self::Number(n) => price(field, &n.to_string(), body),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candlestick {
    t: Number,
    o: Quoted,
    h: Quoted,
    l: Quoted,
    c: Quoted,
}

pub struct GateioAdapter {
    http: HttpClient,
    base_url: String,
    quote_asset: String,
    exclude: Vec<String>,
    interval_minutes: u32,
    limit: u32,
}

impl GateioAdapter {
    #[must_use]
    pub fn new(config: &ExchangeConfig, http: HttpClient) -> Self {
        Self {
            http,
            base_url: config.base_url().to_string(),
            quote_asset: config.quote_asset.clone(),
            exclude: config.exclude(),
            interval_minutes: config.interval_minutes(),
            limit: config.candle_limit,
        }
    }

    fn interval(&self) -> String {
        match self.interval_minutes {
            60 => "1h".into(),
            m => format!("{m}m"),
        }
    }
}

#[async_trait]
impl ExchangeAdapter for GateioAdapter {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Gateio
    }

    async fn list_instruments(&self) -> Result<Vec<Instrument>, ExchangeError> {
        let url = format!("{}/api/v4/futures/usdt/contracts", self.base_url);
        let body = get_text(&self.http, &url, &[]).await?;
        parse_contracts(&body, &self.quote_asset, &self.exclude)
    }

    async fn fetch_candles(&self, instrument: &Instrument) -> Result<Vec<Candle>, ExchangeError> {
        let url = format!("{}/api/v4/futures/usdt/candlesticks", self.base_url);
        let query = [
            ("contract", instrument.symbol().to_string()),
            ("interval", self.interval()),
            ("limit", self.limit.to_string()),
        ];
        let body = get_text(&self.http, &url, &query).await?;
        parse_candlesticks(instrument, &body, self.interval_minutes)
    }
}

pub(crate) fn parse_contracts(
    body: &str,
    quote_asset: &str,
    exclude: &[String],
) -> Result<Vec<Instrument>, ExchangeError> {
    let contracts: Vec<Contract> = decode(body)?;
    Ok(contracts
        .into_iter()
        .filter(|c| !c.in_delisting)
        .filter(|c| c.name.contains(quote_asset))
        .filter(|c| !exclude.contains(&c.name))
        .map(|c| Instrument::new(ExchangeId::Gateio, c.name))
        .collect())
}

pub(crate) fn parse_candlesticks(
    instrument: &Instrument,
    body: &str,
    interval_minutes: u32,
) -> Result<Vec<Candle>, ExchangeError> {
    let sticks: Vec<Candlestick> = decode(body)?;
    let interval = Duration::minutes(i64::from(interval_minutes));

    let bars = sticks
        .iter()
        .map(|stick| {
            let secs = stick
                .t
                .as_i64()
                .or_else(|| stick.t.as_f64().map(|f| f.trunc() as i64))
                .ok_or_else(|| ExchangeError::malformed("t is not a timestamp", body))?;
            let open_time = seconds("t", secs, body)?;
            let prices = Ohlc::new(
                stick.o.to_decimal("o", body)?,
                stick.h.to_decimal("h", body)?,
                stick.l.to_decimal("l", body)?,
                stick.c.to_decimal("c", body)?,
            );
            Candle::try_new(instrument.clone(), open_time, open_time + interval, prices)
                .map_err(|err| ExchangeError::malformed(err.to_string(), body))
        })
        .collect::<Result<Vec<_>, _>>()?;

    chronological(bars, body)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn sol() -> Instrument {
        Instrument::new(ExchangeId::Gateio, "SOL_USDT")
    }

    #[test]
    fn delisting_contracts_are_dropped() {
        let body = r#"[
            {"name": "BTC_USDT", "in_delisting": false, "type": "direct"},
            {"name": "LUNA_USDT", "in_delisting": true, "type": "direct"},
            {"name": "SOL_USDT", "in_delisting": false, "type": "direct"}
        ]"#;
        let instruments = parse_contracts(body, "USDT", &[]).unwrap();
        let symbols: Vec<_> = instruments.iter().map(Instrument::symbol).collect();
        assert_eq!(symbols, vec!["BTC_USDT", "SOL_USDT"]);
    }

    #[test]
    fn candlesticks_use_second_epochs() {
        let body = r#"[
            {"t": 1700000000, "v": 120, "c": "95", "h": "110", "l": "94", "o": "100", "sum": "11400"},
            {"t": 1700000300, "v": 80, "c": "93", "h": "95", "l": "85", "o": "90", "sum": "7440"}
        ]"#;
        let bars = parse_candlesticks(&sol(), body, 5).unwrap();
        assert_eq!(bars[0].open_time().timestamp(), 1_700_000_000);
        assert_eq!(bars[0].close_time().timestamp(), 1_700_000_300);
        assert_eq!(bars[1].low(), dec!(85));
    }

    #[test]
    fn float_timestamps_and_numeric_prices_are_accepted() {
        let body = r#"[
            {"t": 1700000300.0, "c": 93, "h": 95, "l": 85, "o": 90},
            {"t": 1700000000.0, "c": 95, "h": 110, "l": 94, "o": 100}
        ]"#;
        let bars = parse_candlesticks(&sol(), body, 5).unwrap();
        assert_eq!(bars[0].open(), dec!(100));
        assert_eq!(bars[1].close(), dec!(93));
    }

    #[test]
    fn inconsistent_bar_is_malformed() {
        let body = r#"[
            {"t": 1700000000, "c": "95", "h": "90", "l": "94", "o": "100"},
            {"t": 1700000300, "c": "93", "h": "95", "l": "85", "o": "90"}
        ]"#;
        assert!(parse_candlesticks(&sol(), body, 5).unwrap_err().is_malformed());
    }
}
