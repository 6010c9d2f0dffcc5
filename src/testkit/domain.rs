//! Builders for domain primitives used across tests.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::domain::candle::{Candle, Ohlc};
use crate::domain::id::Instrument;
use crate::domain::signal::{Direction, Signal};

/// A five-minute bar opening at `open_time` with `[open, high, low, close]`.
///
/// # Panics
///
/// Panics if the prices do not form a valid bar.
pub fn bar(instrument: Instrument, open_time: DateTime<Utc>, ohlc: [Decimal; 4]) -> Candle {
    let [open, high, low, close] = ohlc;
    Candle::try_new(
        instrument,
        open_time,
        open_time + Duration::minutes(5),
        Ohlc::new(open, high, low, close),
    )
    .expect("valid test bar")
}

/// A bearish signal with the given magnitude. The attached candle is a
/// placeholder and does not reproduce the magnitude.
pub fn signal_for(instrument: Instrument, magnitude_pct: Decimal) -> Signal {
    let candle = bar(
        instrument.clone(),
        DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp"),
        [Decimal::TWO, Decimal::TWO, Decimal::ONE, Decimal::ONE],
    );
    Signal {
        instrument,
        direction: Direction::Bearish,
        magnitude_pct,
        candle,
    }
}
