//! Canonical OHLC bar and the closed-bar selection rule.
//!
//! Every exchange adapter normalizes its native kline encoding into
//! [`Candle`]. Nothing downstream of the adapters knows which exchange a bar
//! came from beyond the [`Instrument`] it carries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::DomainError;
use super::id::Instrument;

/// Open/high/low/close prices of one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ohlc {
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl Ohlc {
    #[must_use]
    pub const fn new(open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }
}

/// A fixed-duration price bar for one instrument.
///
/// Construction goes through [`Candle::try_new`], which enforces
/// `open_time < close_time`, strictly positive prices, and
/// `low <= open, close <= high`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candle {
    instrument: Instrument,
    open_time: DateTime<Utc>,
    close_time: DateTime<Utc>,
    prices: Ohlc,
}

impl Candle {
    /// Create a validated candle.
    pub fn try_new(
        instrument: Instrument,
        open_time: DateTime<Utc>,
        close_time: DateTime<Utc>,
        prices: Ohlc,
    ) -> Result<Self, DomainError> {
        let invalid = |reason: String| DomainError::InvalidCandle {
            instrument: instrument.to_string(),
            reason,
        };

        if open_time >= close_time {
            return Err(invalid(format!(
                "open time {open_time} is not before close time {close_time}"
            )));
        }

        let Ohlc {
            open,
            high,
            low,
            close,
        } = prices;

        if [open, high, low, close].iter().any(|p| *p <= Decimal::ZERO) {
            return Err(invalid("prices must be positive".into()));
        }
        if low > high {
            return Err(invalid(format!("low {low} above high {high}")));
        }
        if open < low || open > high || close < low || close > high {
            return Err(invalid(format!(
                "open {open} / close {close} outside range [{low}, {high}]"
            )));
        }

        Ok(Self {
            instrument,
            open_time,
            close_time,
            prices,
        })
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    #[must_use]
    pub const fn open_time(&self) -> DateTime<Utc> {
        self.open_time
    }

    #[must_use]
    pub const fn close_time(&self) -> DateTime<Utc> {
        self.close_time
    }

    #[must_use]
    pub const fn prices(&self) -> &Ohlc {
        &self.prices
    }

    #[must_use]
    pub const fn open(&self) -> Decimal {
        self.prices.open
    }

    #[must_use]
    pub const fn high(&self) -> Decimal {
        self.prices.high
    }

    #[must_use]
    pub const fn low(&self) -> Decimal {
        self.prices.low
    }

    #[must_use]
    pub const fn close(&self) -> Decimal {
        self.prices.close
    }

    /// True once the bar's interval has fully elapsed at `now`.
    #[must_use]
    pub fn is_closed_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.close_time
    }
}

/// Pick the bar to evaluate from chronologically ordered recent bars.
///
/// Exchanges return the currently forming bar as the newest entry. The newest
/// bar is used only once `now` has reached its close time; otherwise the bar
/// before it is used. Returns `None` for an empty slice, or when a single
/// still-open bar is all there is.
#[must_use]
pub fn select_closed(bars: &[Candle], now: DateTime<Utc>) -> Option<&Candle> {
    let (latest, rest) = bars.split_last()?;
    if latest.is_closed_at(now) {
        Some(latest)
    } else {
        rest.last()
    }
}
