//! Fixed inter-submission delay for fetch fan-out.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Spaces out task submissions by at least `delay`.
///
/// The first call never waits. A zero delay turns every call into a no-op,
/// which is how unpaced exchanges are configured.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    last: Option<Instant>,
}

impl Pacer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay, last: None }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait until the next submission is allowed.
    pub async fn wait(&mut self) {
        if self.delay.is_zero() {
            return;
        }
        if let Some(last) = self.last {
            sleep_until(last + self.delay).await;
        }
        self.last = Some(Instant::now());
    }
}
