//! Scan loop lifecycle.
//!
//! Drives every exchange coordinator on the bucket-aligned schedule:
//! sleep until the next boundary, run all exchanges' cycles concurrently,
//! publish their alerts, repeat. The dedup reset task runs beside the loop.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::adapter::outbound::clock::SystemClock;
use crate::application::dedup::DedupTracker;
use crate::application::dispatch::NotificationDispatcher;
use crate::application::scanner::ScanCoordinator;
use crate::domain::id::ExchangeId;
use crate::domain::scan::ScanCycle;
use crate::domain::schedule::{next_wake, until};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::exchange::{build_coordinators, build_dedup_tracker};
use crate::infrastructure::factory::notifier::build_dispatcher;
use crate::port::outbound::clock::Clock;

/// The wired scanner: coordinators, shared dedup state, and channels.
pub struct ScanLoop {
    coordinators: Vec<ScanCoordinator>,
    dispatcher: NotificationDispatcher,
    dedup: DedupTracker,
    clock: Arc<dyn Clock>,
    bucket_minutes: u32,
}

impl ScanLoop {
    #[must_use]
    pub fn new(
        coordinators: Vec<ScanCoordinator>,
        dispatcher: NotificationDispatcher,
        dedup: DedupTracker,
        clock: Arc<dyn Clock>,
        bucket_minutes: u32,
    ) -> Self {
        Self {
            coordinators,
            dispatcher,
            dedup,
            clock,
            bucket_minutes,
        }
    }

    /// Wire everything from configuration.
    #[allow(clippy::result_large_err)]
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>, only: Option<ExchangeId>) -> Result<Self> {
        let dedup = build_dedup_tracker(config, clock.now())?;
        let coordinators = build_coordinators(config, &clock, &dedup, only)?;
        let dispatcher = build_dispatcher(&config.notifications);
        Ok(Self::new(
            coordinators,
            dispatcher,
            dedup,
            clock,
            config.schedule.bucket_minutes,
        ))
    }

    #[must_use]
    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn dedup(&self) -> &DedupTracker {
        &self.dedup
    }

    #[must_use]
    pub fn exchanges(&self) -> Vec<ExchangeId> {
        self.coordinators.iter().map(ScanCoordinator::exchange).collect()
    }

    /// Load every exchange's baseline instrument list.
    ///
    /// A failed prime is logged; that exchange's first successful refresh
    /// becomes its baseline instead.
    pub async fn prime(&mut self) {
        let results = join_all(self.coordinators.iter_mut().map(|c| async move {
            let exchange = c.exchange();
            (exchange, c.prime().await)
        }))
        .await;

        for (exchange, result) in results {
            if let Err(err) = result {
                warn!(%exchange, error = %err, "Initial instrument load failed");
            }
        }
    }

    /// Run one cycle on every exchange concurrently, without publishing.
    pub async fn scan(&mut self, scheduled_at: DateTime<Utc>) -> Vec<ScanCycle> {
        join_all(
            self.coordinators
                .iter_mut()
                .map(|coordinator| coordinator.run_cycle(scheduled_at)),
        )
        .await
    }

    /// Hand every cycle's alert batch to the dispatcher.
    pub async fn publish(&self, cycles: &[ScanCycle]) {
        for cycle in cycles {
            let outcomes = self.dispatcher.publish(cycle).await;
            let failed = outcomes.iter().filter(|o| !o.is_delivered()).count();
            if failed > 0 {
                warn!(
                    exchange = %cycle.exchange,
                    cycle_id = %cycle.cycle_id,
                    failed,
                    "Some alert deliveries failed"
                );
            }
        }
    }

    /// Scan immediately and publish.
    pub async fn run_once(&mut self) -> Vec<ScanCycle> {
        let cycles = self.scan(self.clock.now()).await;
        self.publish(&cycles).await;
        cycles
    }

    /// Scan on every bucket boundary until `shutdown` flips to `true`.
    ///
    /// The only error is a schedule that cannot produce a next wake time.
    #[allow(clippy::result_large_err)]
    pub async fn run_with_shutdown(mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let reset_task = self
            .dedup
            .is_enabled()
            .then(|| self.dedup.spawn_reset_task(Arc::clone(&self.clock)));

        let outcome = loop {
            let now = self.clock.now();
            let wake = match next_wake(now, self.bucket_minutes) {
                Ok(wake) => wake,
                Err(err) => break Err(err.into()),
            };
            info!(next_scan = %wake, "Waiting for next scan");

            tokio::select! {
                () = tokio::time::sleep(until(now, wake)) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break Ok(());
                    }
                    continue;
                }
            }

            let cycles = tokio::select! {
                cycles = self.scan(wake) => cycles,
                _ = shutdown.changed() => break Ok(()),
            };
            self.publish(&cycles).await;
        };

        if let Some(task) = reset_task {
            task.abort();
        }
        outcome
    }
}

/// Run the scanner until Ctrl+C, or for a single cycle when `once` is set.
#[allow(clippy::result_large_err)]
pub async fn run(config: Config, once: bool) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut scan_loop = ScanLoop::from_config(&config, clock, None)?;

    info!(
        exchanges = ?scan_loop.exchanges(),
        bucket_minutes = config.schedule.bucket_minutes,
        dedup = scan_loop.dedup().is_enabled(),
        "wickscan starting"
    );
    scan_loop.prime().await;

    if once {
        scan_loop.run_once().await;
        info!("wickscan stopped");
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut handle = tokio::spawn(scan_loop.run_with_shutdown(shutdown_rx));

    tokio::select! {
        result = &mut handle => {
            result??;
            info!("wickscan stopped");
            return Ok(());
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received (Ctrl+C)");
            let _ = shutdown_tx.send(true);
        }
    }

    handle.await??;
    info!("wickscan stopped");
    Ok(())
}
