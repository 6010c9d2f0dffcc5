//! REST adapters for the supported exchanges.
//!
//! Each adapter maps one venue's native kline encoding into
//! [`Candle`](crate::domain::candle::Candle) and applies that venue's
//! instrument filters. Shared request and decoding helpers live in [`http`].

pub mod binance;
pub mod bybit;
pub mod gateio;
pub mod http;
pub mod settings;

pub use binance::BinanceAdapter;
pub use bybit::BybitAdapter;
pub use gateio::GateioAdapter;
pub use settings::{ExchangeConfig, HttpConfig};
