//! Shared, reset-windowed alert deduplication.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domain::dedup::DedupWindow;
use crate::domain::id::Instrument;
use crate::domain::schedule::{until, ResetSchedule};
use crate::domain::signal::Signal;
use crate::port::outbound::clock::Clock;

/// Lower bound on the reset task's sleep, so a clock that does not move
/// cannot turn the task into a spin loop.
const MIN_RESET_POLL: Duration = Duration::from_secs(1);

/// Process-wide dedup state shared by every exchange coordinator and the
/// reset task.
///
/// The lock is only taken for short synchronous sections and is never held
/// across an `.await`.
#[derive(Clone)]
pub struct DedupTracker {
    window: Arc<Mutex<DedupWindow>>,
    enabled: bool,
}

impl DedupTracker {
    #[must_use]
    pub fn new(schedule: ResetSchedule, now: DateTime<Utc>) -> Self {
        Self {
            window: Arc::new(Mutex::new(DedupWindow::new(schedule, now))),
            enabled: true,
        }
    }

    /// A tracker that lets every signal through.
    #[must_use]
    pub fn disabled(now: DateTime<Utc>) -> Self {
        Self {
            enabled: false,
            ..Self::new(ResetSchedule::default(), now)
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn should_alert(&self, instrument: &Instrument) -> bool {
        !self.enabled || self.window.lock().should_alert(instrument)
    }

    pub fn record(&self, instrument: Instrument) {
        if self.enabled {
            self.window.lock().record(instrument);
        }
    }

    /// Clear the window if a reset boundary has passed.
    pub fn maybe_reset(&self, now: DateTime<Utc>) -> bool {
        let reset = self.window.lock().maybe_reset(now);
        if reset {
            info!(next_reset = %self.next_reset(), "Dedup window reset");
        }
        reset
    }

    #[must_use]
    pub fn next_reset(&self) -> DateTime<Utc> {
        self.window.lock().next_reset()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.window.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.lock().is_empty()
    }

    /// Keep the signals that may alert and record them, in one locked step.
    ///
    /// Input order is preserved. An instrument appearing twice in `signals`
    /// passes only once.
    pub fn admit(&self, signals: &[Signal]) -> Vec<Signal> {
        if !self.enabled {
            return signals.to_vec();
        }
        let mut window = self.window.lock();
        let mut admitted = Vec::with_capacity(signals.len());
        for signal in signals {
            if window.should_alert(&signal.instrument) {
                window.record(signal.instrument.clone());
                admitted.push(signal.clone());
            } else {
                debug!(instrument = %signal.instrument, "Signal suppressed by dedup window");
            }
        }
        admitted
    }

    /// Run resets on schedule, independent of the scan cadence.
    pub fn spawn_reset_task(&self, clock: Arc<dyn Clock>) -> JoinHandle<()> {
        let tracker = self.clone();
        tokio::spawn(async move {
            loop {
                let now = clock.now();
                tracker.maybe_reset(now);
                let wait = until(now, tracker.next_reset()).max(MIN_RESET_POLL);
                tokio::time::sleep(wait).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::id::ExchangeId;
    use crate::testkit::clock::FixedClock;
    use crate::testkit::domain::signal_for;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 8, h, m, s).unwrap()
    }

    fn inst(symbol: &str) -> Instrument {
        Instrument::new(ExchangeId::Binance, symbol)
    }

    #[test]
    fn record_suppresses_until_reset() {
        let tracker = DedupTracker::new(ResetSchedule::default(), at(11, 30, 0));
        assert!(tracker.should_alert(&inst("SOLUSDT")));

        tracker.record(inst("SOLUSDT"));
        assert!(!tracker.should_alert(&inst("SOLUSDT")));
        assert!(tracker.should_alert(&inst("ETHUSDT")));

        assert!(!tracker.maybe_reset(at(11, 59, 59)));
        assert!(!tracker.should_alert(&inst("SOLUSDT")));

        assert!(tracker.maybe_reset(at(12, 0, 0)));
        assert!(tracker.should_alert(&inst("SOLUSDT")));
        assert_eq!(
            tracker.next_reset(),
            Utc.with_ymd_and_hms(2025, 5, 9, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn admit_filters_and_records() {
        let tracker = DedupTracker::new(ResetSchedule::default(), at(1, 0, 0));
        tracker.record(inst("SOLUSDT"));

        let signals = vec![
            signal_for(inst("SOLUSDT"), dec!(12)),
            signal_for(inst("ETHUSDT"), dec!(9)),
            signal_for(inst("ETHUSDT"), dec!(8)),
        ];
        let admitted = tracker.admit(&signals);

        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].instrument, inst("ETHUSDT"));
        assert!(!tracker.should_alert(&inst("ETHUSDT")));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn disabled_tracker_admits_everything() {
        let tracker = DedupTracker::disabled(at(1, 0, 0));
        tracker.record(inst("SOLUSDT"));
        assert!(tracker.should_alert(&inst("SOLUSDT")));

        let signals = vec![signal_for(inst("SOLUSDT"), dec!(12))];
        assert_eq!(tracker.admit(&signals).len(), 1);
        assert!(tracker.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reset_task_clears_window_at_boundary() {
        let clock = Arc::new(FixedClock::new(at(11, 59, 58)));
        let tracker = DedupTracker::new(ResetSchedule::default(), clock.now());
        tracker.record(inst("SOLUSDT"));

        let task = tracker.spawn_reset_task(clock.clone());
        tokio::task::yield_now().await;
        assert!(!tracker.should_alert(&inst("SOLUSDT")));

        clock.set(at(12, 0, 1));
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(tracker.should_alert(&inst("SOLUSDT")));

        task.abort();
    }
}
