//! Exchange port for instrument discovery and candle retrieval.
//!
//! One implementation exists per venue. Each implementation owns the
//! mapping from its native JSON encoding to [`Candle`]; the scanner is
//! written once against this trait.

use async_trait::async_trait;

use crate::domain::{candle::Candle, id::ExchangeId, id::Instrument};
use crate::error::ExchangeError;

/// REST polling adapter for a single exchange.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`); one adapter is
///   shared by every fetch task of a cycle.
/// - Adapters do not retry. A failure is reported once and the caller
///   decides what to skip.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    /// The venue this adapter talks to.
    fn exchange(&self) -> ExchangeId;

    /// Fetch the full live instrument universe after quote-asset and
    /// delisting filters.
    async fn list_instruments(&self) -> Result<Vec<Instrument>, ExchangeError>;

    /// Fetch the most recent bars for an instrument, normalized and sorted
    /// oldest first.
    ///
    /// At least two bars are returned on success; fewer is reported as a
    /// malformed response.
    async fn fetch_candles(&self, instrument: &Instrument) -> Result<Vec<Candle>, ExchangeError>;
}
