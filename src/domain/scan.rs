//! Result of one scan cycle over a single exchange.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::alert::Alert;
use super::id::{ExchangeId, Instrument};
use super::signal::Signal;

/// Why a unit of scan work failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// The instrument list could not be refreshed; the previous set was used.
    Registry,
    /// Transport failure or non-success HTTP status.
    Network,
    /// The per-request timeout elapsed.
    Timeout,
    /// The exchange answered with something we could not normalize.
    Malformed,
    /// The fetch task itself failed (panic or cancellation).
    Task,
}

impl fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Registry => "registry",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Malformed => "malformed",
            Self::Task => "task",
        };
        f.write_str(label)
    }
}

/// One soft failure recorded during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    /// Instrument the failure belongs to; `None` for registry failures.
    pub instrument: Option<Instrument>,
    pub kind: ScanErrorKind,
    pub message: String,
}

/// Everything one cycle observed and decided.
#[derive(Debug, Clone)]
pub struct ScanCycle {
    /// Correlation id for log lines of this cycle.
    pub cycle_id: Uuid,
    pub exchange: ExchangeId,
    pub scheduled_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub instruments_scanned: usize,
    /// Every signal that met the threshold, ranked.
    pub signals: Vec<Signal>,
    /// Ranked signals that passed the dedup filter.
    pub alerts: Vec<Signal>,
    /// Instruments first seen during this cycle's registry refresh.
    pub registry_delta: Vec<Instrument>,
    pub errors: Vec<ScanError>,
}

impl ScanCycle {
    /// Start an empty cycle record.
    #[must_use]
    pub fn begin(exchange: ExchangeId, scheduled_at: DateTime<Utc>) -> Self {
        Self {
            cycle_id: Uuid::new_v4(),
            exchange,
            scheduled_at,
            completed_at: scheduled_at,
            instruments_scanned: 0,
            signals: Vec::new(),
            alerts: Vec::new(),
            registry_delta: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Signals that were withheld because they already alerted this window.
    pub fn suppressed(&self) -> impl Iterator<Item = &Signal> {
        self.signals
            .iter()
            .filter(|signal| !self.alerts.iter().any(|a| a.instrument == signal.instrument))
    }

    /// Error entries for a given instrument.
    pub fn errors_for<'a>(&'a self, instrument: &'a Instrument) -> impl Iterator<Item = &'a ScanError> {
        self.errors
            .iter()
            .filter(move |e| e.instrument.as_ref() == Some(instrument))
    }

    /// Alerts to hand to the dispatcher: new listings first, then volatility.
    #[must_use]
    pub fn alert_batch(&self) -> Vec<Alert> {
        let mut batch = Vec::with_capacity(2);
        if !self.registry_delta.is_empty() {
            batch.push(Alert::new_listings(self.exchange, &self.registry_delta));
        }
        if !self.alerts.is_empty() {
            batch.push(Alert::volatility(self.exchange, &self.alerts));
        }
        batch
    }
}

/// Sort signals by descending magnitude.
///
/// The sort is stable, so equal magnitudes keep discovery order.
pub fn rank(signals: &mut [Signal]) {
    signals.sort_by(|a, b| b.magnitude_pct.cmp(&a.magnitude_pct));
}
