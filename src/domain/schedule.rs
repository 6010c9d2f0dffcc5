//! Wall-clock alignment for scan wakes and dedup resets.
//!
//! Scans are aligned to bar boundaries so that every wake lands just after
//! the exchanges close a bar. All arithmetic is done in UTC.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveTime, Utc};

use super::error::DomainError;

/// Validate that `minutes` is a positive divisor of the hour.
pub fn validate_bucket(minutes: u32) -> Result<(), DomainError> {
    if minutes == 0 || 60 % minutes != 0 {
        return Err(DomainError::InvalidBucket { minutes });
    }
    Ok(())
}

/// Next instant whose minute-of-hour is a multiple of `bucket_minutes`.
///
/// The result always lies strictly after `now` with seconds and
/// sub-seconds zeroed. When `now` sits exactly on a boundary the following
/// boundary is returned, so a cycle that finishes instantly cannot fire twice
/// for the same slot.
pub fn next_wake(now: DateTime<Utc>, bucket_minutes: u32) -> Result<DateTime<Utc>, DomainError> {
    validate_bucket(bucket_minutes)?;

    // Buckets divide the hour and hours divide the epoch, so aligning on
    // epoch seconds aligns on minute-of-hour.
    let bucket_secs = i64::from(bucket_minutes) * 60;
    let secs = now.timestamp();
    let next = secs - secs.rem_euclid(bucket_secs) + bucket_secs;

    DateTime::from_timestamp(next, 0).ok_or(DomainError::InvalidBucket {
        minutes: bucket_minutes,
    })
}

/// Time left until `target`, zero when it has already passed.
#[must_use]
pub fn until(now: DateTime<Utc>, target: DateTime<Utc>) -> StdDuration {
    (target - now).to_std().unwrap_or_default()
}

/// Daily UTC hours at which the dedup window is cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetSchedule {
    times: Vec<NaiveTime>,
}

impl ResetSchedule {
    /// Build a schedule from UTC hours (duplicates are ignored).
    pub fn new(hours: &[u32]) -> Result<Self, DomainError> {
        let mut times = hours
            .iter()
            .map(|&hour| {
                NaiveTime::from_hms_opt(hour, 0, 0).ok_or(DomainError::InvalidResetHour { hour })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if times.is_empty() {
            return Err(DomainError::EmptyResetSchedule);
        }

        times.sort_unstable();
        times.dedup();
        Ok(Self { times })
    }

    /// First reset boundary strictly after `now`.
    #[must_use]
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();

        self.times
            .iter()
            .map(|time| today.and_time(*time).and_utc())
            .find(|boundary| *boundary > now)
            .unwrap_or_else(|| (today.and_time(self.times[0]) + Duration::days(1)).and_utc())
    }
}

impl Default for ResetSchedule {
    /// Midnight and noon UTC.
    fn default() -> Self {
        Self {
            times: vec![NaiveTime::default(), NaiveTime::default() + Duration::hours(12)],
        }
    }
}
