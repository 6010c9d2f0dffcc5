//! Wickscan - multi-exchange futures volatility scanner.
//!
//! On every bucket boundary (five minutes by default, UTC aligned) wickscan
//! lists the perpetual futures of each configured exchange, fetches the most
//! recent closed bar of every instrument, and flags bars whose close
//! retraced far from their extreme. Flagged instruments are ranked, passed
//! through a dedup window that resets at configured UTC hours, and published
//! as one alert per exchange. Instruments that appear between two scans are
//! announced as new listings.
//!
//! # Architecture
//!
//! - [`domain`] - Candles, signals, schedule math, dedup window. Pure.
//! - [`port`] - Traits for exchanges, alert channels, and the clock.
//! - [`adapter`] - Binance, Bybit and Gate.io REST adapters; push relay,
//!   desktop and log channels; the CLI.
//! - [`application`] - Symbol registry, pacing, scan coordinator, dedup
//!   tracker, notification dispatcher.
//! - [`infrastructure`] - Configuration, wiring, and the scan loop.
//!
//! # Example
//!
//! ```no_run
//! use wickscan::infrastructure::config::settings::Config;
//! use wickscan::infrastructure::orchestration;
//!
//! # async fn example() -> wickscan::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! config.init_logging();
//! orchestration::run(config, true).await
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
