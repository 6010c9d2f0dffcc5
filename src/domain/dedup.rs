//! Reset-windowed alert deduplication state.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::id::Instrument;
use super::schedule::ResetSchedule;

/// Instruments already alerted since the last reset boundary.
///
/// Plain owned state with no interior locking; the application layer decides
/// how it is shared.
#[derive(Debug, Clone)]
pub struct DedupWindow {
    alerted: HashSet<Instrument>,
    schedule: ResetSchedule,
    next_reset: DateTime<Utc>,
}

impl DedupWindow {
    /// Create an empty window whose first reset is the next boundary after `now`.
    #[must_use]
    pub fn new(schedule: ResetSchedule, now: DateTime<Utc>) -> Self {
        let next_reset = schedule.next_after(now);
        Self {
            alerted: HashSet::new(),
            schedule,
            next_reset,
        }
    }

    /// True when the instrument has not been alerted in the current window.
    #[must_use]
    pub fn should_alert(&self, instrument: &Instrument) -> bool {
        !self.alerted.contains(instrument)
    }

    /// Mark an instrument as alerted until the next reset.
    pub fn record(&mut self, instrument: Instrument) {
        self.alerted.insert(instrument);
    }

    /// Clear the window if `now` has reached the reset boundary.
    ///
    /// Returns `true` when a reset happened. The following boundary is
    /// computed from `now`, so boundaries missed while the process was
    /// suspended collapse into a single reset.
    pub fn maybe_reset(&mut self, now: DateTime<Utc>) -> bool {
        if now < self.next_reset {
            return false;
        }
        self.alerted.clear();
        self.next_reset = self.schedule.next_after(now);
        true
    }

    #[must_use]
    pub const fn next_reset(&self) -> DateTime<Utc> {
        self.next_reset
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.alerted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerted.is_empty()
    }
}
