//! Human-readable alerts handed to notification channels.

use std::fmt;

use super::id::{ExchangeId, Instrument};
use super::signal::Signal;

/// Kind of alert, used by channels that format differently per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Instruments that appeared on the exchange since the last refresh.
    NewListings,
    /// Bars whose wick-to-close magnitude met the threshold.
    Volatility,
    /// Operator-triggered delivery check.
    Test,
}

/// A titled message delivered to every configured channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub body: String,
}

impl Alert {
    pub fn new(kind: AlertKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
        }
    }

    /// Alert listing newly observed instruments.
    #[must_use]
    pub fn new_listings(exchange: ExchangeId, added: &[Instrument]) -> Self {
        let body = added
            .iter()
            .map(Instrument::ticker)
            .collect::<Vec<_>>()
            .join(", ");
        Self::new(
            AlertKind::NewListings,
            format!("{exchange} new listings"),
            body,
        )
    }

    /// Alert listing ranked volatility signals.
    #[must_use]
    pub fn volatility(exchange: ExchangeId, signals: &[Signal]) -> Self {
        let body = signals
            .iter()
            .map(Signal::summary)
            .collect::<Vec<_>>()
            .join(", ");
        Self::new(AlertKind::Volatility, format!("{exchange} volatility"), body)
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.body)
    }
}
