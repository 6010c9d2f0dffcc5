//! Wick-to-close volatility signal.
//!
//! The magnitude measures how far a bar's close retraced from its extreme:
//! from the high for a bearish bar, from the low for a bullish one. A bar
//! with a sharp intrabar reversal scores high even when it closes near its
//! open, which a plain open-to-close return would miss.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::candle::Candle;
use super::id::Instrument;

/// Bar direction. A close equal to the open counts as bullish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    /// Classify a bar by comparing close to open.
    #[must_use]
    pub fn of(candle: &Candle) -> Self {
        if candle.close() < candle.open() {
            Self::Bearish
        } else {
            Self::Bullish
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullish => f.write_str("bullish"),
            Self::Bearish => f.write_str("bearish"),
        }
    }
}

/// Per-instrument result of a bar that met its exchange's threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    /// Instrument the bar belongs to.
    pub instrument: Instrument,
    /// Direction of the evaluated bar.
    pub direction: Direction,
    /// Wick-to-close retracement in percent.
    pub magnitude_pct: Decimal,
    /// The evaluated (closed) bar.
    pub candle: Candle,
}

impl Signal {
    /// One-line alert fragment, e.g. `BTCUSDT: bearish 13.64%`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {} {:.2}%",
            self.instrument.ticker(),
            self.direction,
            self.magnitude_pct.round_dp(2)
        )
    }
}

/// Wick-to-close magnitude of a bar in percent.
///
/// Bearish: `(high - close) / high * 100`. Bullish: `(close - low) / low * 100`.
/// Validated candles have positive prices, so neither division can fail.
#[must_use]
pub fn magnitude_pct(candle: &Candle) -> Decimal {
    match Direction::of(candle) {
        Direction::Bearish => (candle.high() - candle.close()) / candle.high() * dec!(100),
        Direction::Bullish => (candle.close() - candle.low()) / candle.low() * dec!(100),
    }
}

/// Evaluate a closed bar against a percentage threshold.
///
/// Returns a [`Signal`] when the magnitude is at least `threshold_pct`.
#[must_use]
pub fn evaluate(candle: &Candle, threshold_pct: Decimal) -> Option<Signal> {
    let magnitude = magnitude_pct(candle);
    if magnitude < threshold_pct {
        return None;
    }

    Some(Signal {
        instrument: candle.instrument().clone(),
        direction: Direction::of(candle),
        magnitude_pct: magnitude,
        candle: candle.clone(),
    })
}
