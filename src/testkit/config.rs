//! Canonical test configurations.
//!
//! Single source of truth for settings used across tests.

use std::time::Duration;

use rust_decimal::Decimal;

use crate::adapter::outbound::exchange::ExchangeConfig;
use crate::application::scanner::ScanSettings;
use crate::domain::id::ExchangeId;
use crate::infrastructure::config::settings::Config;

/// Unpaced scan settings with a generous fetch timeout.
pub fn scan_settings(threshold_pct: Decimal) -> ScanSettings {
    ScanSettings {
        threshold_pct,
        pacing: Duration::ZERO,
        fetch_timeout: Duration::from_secs(5),
    }
}

/// A default configuration scanning exactly `kinds`, with only the log
/// channel enabled.
pub fn config_for(kinds: &[ExchangeId]) -> Config {
    let mut config = Config::default();
    config.exchanges = kinds.iter().copied().map(ExchangeConfig::new).collect();
    config.notifications.desktop.enabled = false;
    config.notifications.push.enabled = false;
    config.notifications.log.enabled = true;
    config
}
