//! Bybit v5 linear-perpetual adapter.
//!
//! Every response is wrapped in a `{retCode, retMsg, result}` envelope; a
//! non-zero `retCode` is treated as a malformed response. Klines are arrays
//! of strings, newest first, with a millisecond start time and no close
//! time (close is start plus the interval).

use async_trait::async_trait;
use chrono::Duration;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use super::http::{chronological, decode, get_text, millis, price};
use super::settings::ExchangeConfig;
use crate::domain::candle::{Candle, Ohlc};
use crate::domain::id::{ExchangeId, Instrument};
use crate::error::ExchangeError;
use crate::port::outbound::exchange::ExchangeAdapter;

const PAGE_LIMIT: u32 = 1000;
const MAX_PAGES: usize = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    ret_code: i64,
    #[serde(default)]
    ret_msg: String,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstrumentPage {
    #[serde(default)]
    list: Vec<InstrumentInfo>,
    #[serde(default)]
    next_page_cursor: String,
}

#[derive(Debug, Deserialize)]
struct InstrumentInfo {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct KlinePage {
    #[serde(default)]
    list: Vec<Vec<String>>,
}

pub struct BybitAdapter {
    http: HttpClient,
    base_url: String,
    quote_asset: String,
    exclude: Vec<String>,
    interval_minutes: u32,
    limit: u32,
}

impl BybitAdapter {
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
}

#[async_trait]
impl ExchangeAdapter for BybitAdapter {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Bybit
    }

    async fn list_instruments(&self) -> Result<Vec<Instrument>, ExchangeError> {
        let url = format!("{}/v5/market/instruments-info", self.base_url);
        let mut instruments = Vec::new();
        let mut cursor = String::new();

        for _ in 0..MAX_PAGES {
            let mut query = vec![
                ("category", "linear".to_string()),
                ("status", "Trading".to_string()),
                ("limit", PAGE_LIMIT.to_string()),
            ];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.clone()));
            }
            let body = get_text(&self.http, &url, &query).await?;
            let (page, next) = parse_instrument_page(&body, &self.quote_asset, &self.exclude)?;
            instruments.extend(page);
            if next.is_empty() {
                break;
            }
            cursor = next;
        }

        Ok(instruments)
    }

    async fn fetch_candles(&self, instrument: &Instrument) -> Result<Vec<Candle>, ExchangeError> {
        let url = format!("{}/v5/market/kline", self.base_url);
        let query = [
            ("category", "linear".to_string()),
            ("symbol", instrument.symbol().to_string()),
            ("interval", self.interval_minutes.to_string()),
            ("limit", self.limit.to_string()),
        ];
        let body = get_text(&self.http, &url, &query).await?;
        parse_klines(instrument, &body, self.interval_minutes)
    }
}

fn unwrap_envelope<T>(envelope: Envelope<T>, body: &str) -> Result<T, ExchangeError> {
    if envelope.ret_code != 0 {
        return Err(ExchangeError::Api {
            code: envelope.ret_code,
            message: envelope.ret_msg,
        });
    }
    envelope
        .result
        .ok_or_else(|| ExchangeError::malformed("missing result", body))
}

/// Parse one instrument page, returning the filtered instruments and the
/// next-page cursor (empty on the last page).
pub(crate) fn parse_instrument_page(
    body: &str,
    quote_asset: &str,
    exclude: &[String],
) -> Result<(Vec<Instrument>, String), ExchangeError> {
    let envelope: Envelope<InstrumentPage> = decode(body)?;
    let page = unwrap_envelope(envelope, body)?;
    let instruments = page
        .list
        .into_iter()
        .filter(|i| i.symbol.contains(quote_asset))
        .filter(|i| !exclude.contains(&i.symbol))
        .map(|i| Instrument::new(ExchangeId::Bybit, i.symbol))
        .collect();
    Ok((instruments, page.next_page_cursor))
}

pub(crate) fn parse_klines(
    instrument: &Instrument,
    body: &str,
    interval_minutes: u32,
) -> Result<Vec<Candle>, ExchangeError> {
    let envelope: Envelope<KlinePage> = decode(body)?;
    let page = unwrap_envelope(envelope, body)?;
    let interval = Duration::minutes(i64::from(interval_minutes));

    let bars = page
        .list
        .iter()
        .map(|row| {
            if row.len() < 5 {
                return Err(ExchangeError::malformed(
                    format!("kline has {} fields, expected at least 5", row.len()),
                    body,
                ));
            }
            let start_ms: i64 = row[0]
                .parse()
                .map_err(|_| ExchangeError::malformed("start time is not an integer", body))?;
            let open_time = millis("start", start_ms, body)?;
            let prices = Ohlc::new(
                price("open", &row[1], body)?,
                price("high", &row[2], body)?,
                price("low", &row[3], body)?,
                price("close", &row[4], body)?,
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

    const KLINES: &str = r#"{
        "retCode": 0,
        "retMsg": "OK",
        "result": {
            "symbol": "SOLUSDT",
            "category": "linear",
            "list": [
                ["1700000300000", "90", "95", "85", "93", "1000", "93000"],
                ["1700000000000", "100", "110", "94", "95", "1200", "114000"]
            ]
        },
        "time": 1700000400000
    }"#;

    fn sol() -> Instrument {
        Instrument::new(ExchangeId::Bybit, "SOLUSDT")
    }

    #[test]
    fn klines_are_reordered_oldest_first() {
        let bars = parse_klines(&sol(), KLINES, 5).unwrap();
        assert_eq!(bars[0].open(), dec!(100));
        assert_eq!(bars[1].open(), dec!(90));
        assert!(bars[0].open_time() < bars[1].open_time());
    }

    #[test]
    fn close_time_is_start_plus_interval() {
        let bars = parse_klines(&sol(), KLINES, 5).unwrap();
        let bar = &bars[1];
        assert_eq!(bar.close_time() - bar.open_time(), Duration::minutes(5));
    }

    #[test]
    fn nonzero_ret_code_is_an_api_error() {
        let body = r#"{"retCode": 10001, "retMsg": "params error: symbol invalid", "result": {}}"#;
        match parse_klines(&sol(), body, 5).unwrap_err() {
            ExchangeError::Api { code, message } => {
                assert_eq!(code, 10001);
                assert!(message.contains("symbol invalid"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn instrument_page_filters_and_reports_cursor() {
        let body = r#"{
            "retCode": 0,
            "retMsg": "OK",
            "result": {
                "category": "linear",
                "list": [
                    {"symbol": "BTCUSDT", "status": "Trading"},
                    {"symbol": "BTCPERP", "status": "Trading"},
                    {"symbol": "10000LADYSUSDT", "status": "Trading"}
                ],
                "nextPageCursor": "abc"
            }
        }"#;
        let (instruments, cursor) = parse_instrument_page(body, "USDT", &[]).unwrap();
        let symbols: Vec<_> = instruments.iter().map(Instrument::symbol).collect();
        assert_eq!(symbols, vec!["BTCUSDT", "10000LADYSUSDT"]);
        assert_eq!(cursor, "abc");
    }

    #[test]
    fn empty_list_is_insufficient() {
        let body = r#"{"retCode": 0, "retMsg": "OK", "result": {"list": []}}"#;
        assert!(parse_klines(&sol(), body, 5).unwrap_err().is_malformed());
    }
}
