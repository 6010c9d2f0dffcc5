//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated.
//! These errors are returned by `try_new` constructors that validate inputs.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use rust_decimal_macros::dec;
//! use wickscan::domain::candle::{Candle, Ohlc};
//! use wickscan::domain::error::DomainError;
//! use wickscan::domain::id::{ExchangeId, Instrument};
//!
//! let open_time = Utc.with_ymd_and_hms(2025, 5, 8, 11, 0, 0).unwrap();
//!
//! // Close time equal to open time violates the bar invariant
//! let result = Candle::try_new(
//!     Instrument::new(ExchangeId::Binance, "BTCUSDT"),
//!     open_time,
//!     open_time,
//!     Ohlc::new(dec!(100), dec!(110), dec!(90), dec!(95)),
//! );
//!
//! assert!(matches!(result, Err(DomainError::InvalidCandle { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A bar violated the OHLC invariants.
    #[error("invalid candle for {instrument}: {reason}")]
    InvalidCandle {
        /// The instrument the bar belongs to.
        instrument: String,
        /// Which invariant was violated.
        reason: String,
    },

    /// Bucket size must be a positive divisor of 60 minutes.
    #[error("bucket of {minutes} minutes does not divide the hour")]
    InvalidBucket {
        /// The rejected bucket size.
        minutes: u32,
    },

    /// A dedup reset hour must lie within a UTC day.
    #[error("reset hour {hour} is outside 0..24")]
    InvalidResetHour {
        /// The rejected hour.
        hour: u32,
    },

    /// The dedup reset schedule needs at least one boundary.
    #[error("reset schedule has no hours")]
    EmptyResetSchedule,
}
