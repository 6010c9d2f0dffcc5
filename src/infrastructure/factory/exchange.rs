//! Exchange adapter and scan coordinator factory.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use tracing::info;

use crate::adapter::outbound::exchange::http::build_client;
use crate::adapter::outbound::exchange::{
    BinanceAdapter, BybitAdapter, ExchangeConfig, GateioAdapter,
};
use crate::application::dedup::DedupTracker;
use crate::application::scanner::{ScanCoordinator, ScanSettings};
use crate::domain::id::ExchangeId;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::clock::Clock;
use crate::port::outbound::exchange::ExchangeAdapter;

/// Build the REST adapter for one exchange entry.
#[must_use]
pub fn build_exchange_adapter(config: &ExchangeConfig, http: HttpClient) -> Arc<dyn ExchangeAdapter> {
    match config.kind {
        ExchangeId::Binance => Arc::new(BinanceAdapter::new(config, http)),
        ExchangeId::Bybit => Arc::new(BybitAdapter::new(config, http)),
        ExchangeId::Gateio => Arc::new(GateioAdapter::new(config, http)),
    }
}

/// Build the shared dedup tracker.
#[allow(clippy::result_large_err)]
pub fn build_dedup_tracker(config: &Config, now: DateTime<Utc>) -> Result<DedupTracker> {
    if !config.dedup.enabled {
        info!("Alert dedup disabled");
        return Ok(DedupTracker::disabled(now));
    }
    let schedule = config.dedup.reset_schedule()?;
    Ok(DedupTracker::new(schedule, now))
}

/// Build one coordinator per enabled exchange, optionally restricted to
/// `only`.
#[allow(clippy::result_large_err)]
pub fn build_coordinators(
    config: &Config,
    clock: &Arc<dyn Clock>,
    dedup: &DedupTracker,
    only: Option<ExchangeId>,
) -> Result<Vec<ScanCoordinator>> {
    let http = build_client(&config.http);
    let coordinators: Vec<_> = config
        .enabled_exchanges()
        .filter(|exchange| only.map_or(true, |kind| exchange.kind == kind))
        .map(|exchange| {
            let settings = ScanSettings {
                threshold_pct: exchange.threshold_pct(),
                pacing: exchange.pacing(),
                fetch_timeout: config.schedule.fetch_timeout(),
            };
            info!(
                exchange = %exchange.kind,
                base_url = exchange.base_url(),
                threshold_pct = %settings.threshold_pct,
                pacing_ms = settings.pacing.as_millis() as u64,
                "Exchange configured"
            );
            ScanCoordinator::new(
                build_exchange_adapter(exchange, http.clone()),
                settings,
                Arc::clone(clock),
                dedup.clone(),
            )
        })
        .collect();

    if coordinators.is_empty() {
        let reason = match only {
            Some(kind) => format!("{} is not enabled in the configuration", kind.as_str()),
            None => "no exchange is enabled".to_string(),
        };
        return Err(ConfigError::InvalidValue {
            field: "exchanges",
            reason,
        }
        .into());
    }
    Ok(coordinators)
}
