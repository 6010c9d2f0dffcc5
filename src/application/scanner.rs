//! One exchange's scan cycle: refresh, fan out, evaluate, rank, dedup.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use rust_decimal::Decimal;
use tracing::{debug, info, info_span, warn, Instrument as _};

use super::dedup::DedupTracker;
use super::pacing::Pacer;
use super::registry::SymbolRegistry;
use crate::domain::candle::select_closed;
use crate::domain::id::{ExchangeId, Instrument};
use crate::domain::scan::{rank, ScanCycle, ScanError, ScanErrorKind};
use crate::domain::signal::{evaluate, Signal};
use crate::error::ExchangeError;
use crate::port::outbound::clock::Clock;
use crate::port::outbound::exchange::ExchangeAdapter;

/// Per-exchange knobs for a cycle.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub threshold_pct: Decimal,
    pub pacing: Duration,
    pub fetch_timeout: Duration,
}

/// Why a single fetch+evaluate unit failed.
#[derive(Debug)]
struct UnitFailure {
    kind: ScanErrorKind,
    message: String,
}

impl From<ExchangeError> for UnitFailure {
    fn from(err: ExchangeError) -> Self {
        let kind = match &err {
            ExchangeError::Network(_) | ExchangeError::Status { .. } => ScanErrorKind::Network,
            ExchangeError::Timeout { .. } => ScanErrorKind::Timeout,
            ExchangeError::Api { .. } | ExchangeError::Malformed { .. } => ScanErrorKind::Malformed,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Drives scan cycles for one exchange.
///
/// Owns the exchange's [`SymbolRegistry`]; the [`DedupTracker`] is shared
/// with the other coordinators.
pub struct ScanCoordinator {
    adapter: Arc<dyn ExchangeAdapter>,
    registry: SymbolRegistry,
    settings: ScanSettings,
    clock: Arc<dyn Clock>,
    dedup: DedupTracker,
}

impl ScanCoordinator {
    #[must_use]
    pub fn new(
        adapter: Arc<dyn ExchangeAdapter>,
        settings: ScanSettings,
        clock: Arc<dyn Clock>,
        dedup: DedupTracker,
    ) -> Self {
        Self {
            registry: SymbolRegistry::new(Arc::clone(&adapter)),
            adapter,
            settings,
            clock,
            dedup,
        }
    }

    #[must_use]
    pub fn exchange(&self) -> ExchangeId {
        self.adapter.exchange()
    }

    #[must_use]
    pub const fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    #[must_use]
    pub const fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    /// Load the baseline instrument set.
    pub async fn prime(&mut self) -> Result<usize, ExchangeError> {
        self.registry.prime().await
    }

    /// Run one full cycle.
    ///
    /// Never fails: registry and per-instrument failures are recorded in
    /// [`ScanCycle::errors`] and the rest of the cycle proceeds.
    pub async fn run_cycle(&mut self, scheduled_at: DateTime<Utc>) -> ScanCycle {
        let mut cycle = ScanCycle::begin(self.exchange(), scheduled_at);
        let span = info_span!("cycle", cycle_id = %cycle.cycle_id, exchange = %cycle.exchange);

        async {
            let refresh = self.registry.refresh().await;
            if let Some(err) = refresh.error {
                cycle.errors.push(ScanError {
                    instrument: None,
                    kind: ScanErrorKind::Registry,
                    message: err.to_string(),
                });
            }
            cycle.registry_delta = refresh.added;
            cycle.instruments_scanned = refresh.current.len();

            let outcomes = self.fan_out(&refresh.current).await;

            let mut signals = Vec::new();
            for (instrument, outcome) in refresh.current.into_iter().zip(outcomes) {
                match outcome {
                    Ok(Some(signal)) => signals.push(signal),
                    Ok(None) => {}
                    Err(failure) => {
                        debug!(%instrument, kind = %failure.kind, error = %failure.message, "Instrument skipped");
                        cycle.errors.push(ScanError {
                            instrument: Some(instrument),
                            kind: failure.kind,
                            message: failure.message,
                        });
                    }
                }
            }

            rank(&mut signals);
            self.dedup.maybe_reset(self.clock.now());
            cycle.alerts = self.dedup.admit(&signals);
            cycle.signals = signals;
            cycle.completed_at = self.clock.now();

            log_summary(&cycle);
        }
        .instrument(span)
        .await;

        cycle
    }

    /// Launch one task per instrument, paced, and join them in submission
    /// order.
    async fn fan_out(&self, instruments: &[Instrument]) -> Vec<Result<Option<Signal>, UnitFailure>> {
        let mut pacer = Pacer::new(self.settings.pacing);
        let mut handles = Vec::with_capacity(instruments.len());

        for instrument in instruments {
            pacer.wait().await;
            let adapter = Arc::clone(&self.adapter);
            let clock = Arc::clone(&self.clock);
            let instrument = instrument.clone();
            let threshold = self.settings.threshold_pct;
            let fetch_timeout = self.settings.fetch_timeout;
            handles.push(tokio::spawn(async move {
                scan_instrument(adapter.as_ref(), clock.as_ref(), &instrument, threshold, fetch_timeout).await
            }));
        }

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| {
                joined.unwrap_or_else(|err| {
                    Err(UnitFailure {
                        kind: ScanErrorKind::Task,
                        message: err.to_string(),
                    })
                })
            })
            .collect()
    }
}

/// Fetch, select the closed bar, evaluate.
async fn scan_instrument(
    adapter: &dyn ExchangeAdapter,
    clock: &dyn Clock,
    instrument: &Instrument,
    threshold_pct: Decimal,
    fetch_timeout: Duration,
) -> Result<Option<Signal>, UnitFailure> {
    let bars = match tokio::time::timeout(fetch_timeout, adapter.fetch_candles(instrument)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(ExchangeError::Timeout {
                timeout_ms: u64::try_from(fetch_timeout.as_millis()).unwrap_or(u64::MAX),
            }
            .into())
        }
    };

    let candle = select_closed(&bars, clock.now()).ok_or_else(|| UnitFailure {
        kind: ScanErrorKind::Malformed,
        message: "no closed bar in response".into(),
    })?;

    Ok(evaluate(candle, threshold_pct))
}

fn log_summary(cycle: &ScanCycle) {
    let suppressed = cycle.signals.len() - cycle.alerts.len();
    if cycle.errors.is_empty() {
        info!(
            scanned = cycle.instruments_scanned,
            signals = cycle.signals.len(),
            alerts = cycle.alerts.len(),
            suppressed,
            new_listings = cycle.registry_delta.len(),
            "Scan cycle complete"
        );
    } else {
        warn!(
            scanned = cycle.instruments_scanned,
            signals = cycle.signals.len(),
            alerts = cycle.alerts.len(),
            suppressed,
            new_listings = cycle.registry_delta.len(),
            errors = cycle.errors.len(),
            "Scan cycle complete with errors"
        );
    }
}
