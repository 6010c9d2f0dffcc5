//! Binance USD-M futures adapter.
//!
//! Klines arrive as positional arrays, oldest first, with millisecond epochs
//! and an explicit close time:
//!
//! ```text
//! [open_time, "open", "high", "low", "close", "volume", close_time, ...]
//! ```

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;

use super::http::{chronological, decode, get_text, millis, price};
use super::settings::ExchangeConfig;
use crate::domain::candle::{Candle, Ohlc};
use crate::domain::id::{ExchangeId, Instrument};
use crate::error::ExchangeError;
use crate::port::outbound::exchange::ExchangeAdapter;

#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    symbol: String,
    #[serde(default)]
    status: String,
}

pub struct BinanceAdapter {
    http: HttpClient,
    base_url: String,
    quote_asset: String,
    exclude: Vec<String>,
    interval_minutes: u32,
    limit: u32,
}

impl BinanceAdapter {
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
impl ExchangeAdapter for BinanceAdapter {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Binance
    }

    async fn list_instruments(&self) -> Result<Vec<Instrument>, ExchangeError> {
        let url = format!("{}/fapi/v1/exchangeInfo", self.base_url);
        let body = get_text(&self.http, &url, &[]).await?;
        parse_instruments(&body, &self.quote_asset, &self.exclude)
    }

    async fn fetch_candles(&self, instrument: &Instrument) -> Result<Vec<Candle>, ExchangeError> {
        let url = format!("{}/fapi/v1/klines", self.base_url);
        let query = [
            ("symbol", instrument.symbol().to_string()),
            ("interval", self.interval()),
            ("limit", self.limit.to_string()),
        ];
        let body = get_text(&self.http, &url, &query).await?;
        parse_klines(instrument, &body)
    }
}

pub(crate) fn parse_instruments(
    body: &str,
    quote_asset: &str,
    exclude: &[String],
) -> Result<Vec<Instrument>, ExchangeError> {
    let info: ExchangeInfo = decode(body)?;
    Ok(info
        .symbols
        .into_iter()
        .filter(|s| s.status == "TRADING")
        .filter(|s| s.symbol.contains(quote_asset))
        .filter(|s| !exclude.contains(&s.symbol))
        .map(|s| Instrument::new(ExchangeId::Binance, s.symbol))
        .collect())
}

pub(crate) fn parse_klines(instrument: &Instrument, body: &str) -> Result<Vec<Candle>, ExchangeError> {
    let rows: Vec<Vec<Value>> = decode(body)?;
    let bars = rows
        .iter()
        .map(|row| parse_row(instrument, row, body))
        .collect::<Result<Vec<_>, _>>()?;
    chronological(bars, body)
}

fn parse_row(instrument: &Instrument, row: &[Value], body: &str) -> Result<Candle, ExchangeError> {
    if row.len() < 7 {
        return Err(ExchangeError::malformed(
            format!("kline has {} fields, expected at least 7", row.len()),
            body,
        ));
    }
    let epoch = |idx: usize, field: &str| {
        row[idx]
            .as_i64()
            .ok_or_else(|| ExchangeError::malformed(format!("{field} is not an integer"), body))
            .and_then(|ms| millis(field, ms, body))
    };
    let decimal = |idx: usize, field: &str| match &row[idx] {
        Value::String(raw) => price(field, raw, body),
        Value::Number(n) => price(field, &n.to_string(), body),
        _ => Err(ExchangeError::malformed(format!("{field} is not a number"), body)),
    };

    let prices = Ohlc::new(
        decimal(1, "open")?,
        decimal(2, "high")?,
        decimal(3, "low")?,
        decimal(4, "close")?,
    );
    Candle::try_new(
        instrument.clone(),
        epoch(0, "open_time")?,
        epoch(6, "close_time")?,
        prices,
    )
    .map_err(|err| ExchangeError::malformed(err.to_string(), body))
}
