//! System wall clock.

use chrono::{DateTime, Utc};

use crate::port::outbound::clock::Clock;

/// [`Clock`] backed by the operating system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
