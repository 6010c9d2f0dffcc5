//! Scan cadence and dedup window configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::error::DomainError;
use crate::domain::schedule::ResetSchedule;

/// `[schedule]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Scan boundary in minutes; must divide 60.
    #[serde(default = "default_bucket_minutes")]
    pub bucket_minutes: u32,
    /// Per-instrument candle fetch timeout in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

const fn default_bucket_minutes() -> u32 {
    5
}

const fn default_fetch_timeout_ms() -> u64 {
    10_000
}

impl ScheduleConfig {
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            bucket_minutes: default_bucket_minutes(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

/// `[dedup]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DedupConfig {
    #[serde(default = "default_dedup_enabled")]
    pub enabled: bool,
    /// UTC hours at which the alerted set is cleared.
    #[serde(default = "default_reset_hours_utc")]
    pub reset_hours_utc: Vec<u32>,
}

const fn default_dedup_enabled() -> bool {
    true
}

fn default_reset_hours_utc() -> Vec<u32> {
    vec![0, 12]
}

impl DedupConfig {
    pub fn reset_schedule(&self) -> Result<ResetSchedule, DomainError> {
        ResetSchedule::new(&self.reset_hours_utc)
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            enabled: default_dedup_enabled(),
            reset_hours_utc: default_reset_hours_utc(),
        }
    }
}
