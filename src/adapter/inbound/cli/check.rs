//! Configuration and notification checks.

use std::path::Path;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::application::dispatch::ChannelOutcome;
use crate::domain::alert::{Alert, AlertKind};
use crate::error::{NotificationError, Result};
use crate::infrastructure::config::settings::{Config, PUSH_TOKEN_ENV};
use crate::infrastructure::factory::notifier::build_dispatcher;

#[derive(Tabled)]
struct ExchangeRow {
    #[tabled(rename = "Exchange")]
    exchange: String,
    #[tabled(rename = "Threshold %")]
    threshold: String,
    #[tabled(rename = "Interval")]
    interval: String,
    #[tabled(rename = "Pacing")]
    pacing: String,
    #[tabled(rename = "Base URL")]
    base_url: String,
}

/// Validate configuration file without starting the scanner.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;

    if output::is_json() {
        output::json_output(config_report(&config));
        return Ok(());
    }

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    output::section("Schedule");
    output::field("Bucket", format!("{} min", config.schedule.bucket_minutes));
    output::field("Timeout", format!("{} ms", config.schedule.fetch_timeout_ms));
    if config.dedup.enabled {
        output::field("Dedup", format!("resets at {:?} UTC", config.dedup.reset_hours_utc));
    } else {
        output::field("Dedup", "disabled");
    }

    output::section("Exchanges");
    let rows: Vec<_> = config
        .enabled_exchanges()
        .map(|exchange| ExchangeRow {
            exchange: exchange.kind.to_string(),
            threshold: exchange.threshold_pct().to_string(),
            interval: format!("{}m", exchange.interval_minutes()),
            pacing: format!("{}ms", exchange.pacing().as_millis()),
            base_url: exchange.base_url().to_string(),
        })
        .collect();
    output::lines(&Table::new(rows).to_string());

    output::section("Notifications");
    let notifications = &config.notifications;
    output::field("Log", enabled_label(notifications.log.enabled));
    output::field("Desktop", enabled_label(notifications.desktop.enabled));
    if notifications.push.enabled {
        output::success(&format!("Push relay configured ({PUSH_TOKEN_ENV} set)"));
    } else {
        output::field("Push", "disabled");
    }
    if !notifications.log.enabled && !notifications.desktop.enabled && !notifications.push.enabled {
        output::warning("No alert channel is enabled - alerts will be dropped");
    }

    output::success("Configuration check complete");
    Ok(())
}

/// Send a test alert on every enabled channel and report each outcome.
pub async fn execute_notify<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load(config_path.as_ref())?;
    config.init_logging();

    let dispatcher = build_dispatcher(&config.notifications);
    if dispatcher.is_empty() {
        output::warning("No alert channel is enabled");
        return Ok(());
    }

    let alert = Alert::new(
        AlertKind::Test,
        "wickscan test alert",
        "If you can read this, alerts are reaching this channel.",
    );
    let pb = output::spinner(&format!("Sending test alert to {} channels...", dispatcher.len()));
    let outcomes = dispatcher.dispatch(&alert).await;
    let failed = outcomes.iter().filter(|o| !o.is_delivered()).count();

    if failed == 0 {
        output::spinner_success(&pb, "Test alert delivered");
    } else {
        output::spinner_fail(&pb, &format!("{failed} of {} channels failed", outcomes.len()));
    }
    report_outcomes(&outcomes);

    if failed > 0 {
        return Err(NotificationError::Delivery {
            channel: "check".to_string(),
            reason: format!("{failed} of {} channels failed", outcomes.len()),
        }
        .into());
    }
    Ok(())
}

fn report_outcomes(outcomes: &[ChannelOutcome]) {
    for outcome in outcomes {
        match &outcome.result {
            Ok(()) => output::success(&format!("{}: delivered", outcome.channel)),
            Err(err) => output::error(&format!("{}: {err}", outcome.channel)),
        }
    }
}

const fn enabled_label(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

fn config_report(config: &Config) -> serde_json::Value {
    let exchanges: Vec<_> = config
        .enabled_exchanges()
        .map(|exchange| {
            json!({
                "kind": exchange.kind.as_str(),
                "threshold_pct": exchange.threshold_pct().to_string(),
                "interval_minutes": exchange.interval_minutes(),
                "pacing_ms": exchange.pacing().as_millis() as u64,
                "base_url": exchange.base_url(),
            })
        })
        .collect();
    json!({
        "command": "check.config",
        "valid": true,
        "bucket_minutes": config.schedule.bucket_minutes,
        "dedup": {
            "enabled": config.dedup.enabled,
            "reset_hours_utc": config.dedup.reset_hours_utc,
        },
        "exchanges": exchanges,
        "notifications": {
            "log": config.notifications.log.enabled,
            "desktop": config.notifications.desktop.enabled,
            "push": config.notifications.push.enabled,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_enabled_exchanges_only() {
        let config = Config::parse_toml(
            "[[exchanges]]\nkind = \"binance\"\n[[exchanges]]\nkind = \"gateio\"\n[[exchanges]]\nkind = \"bybit\"\nenabled = false\n",
        )
        .unwrap();

        let report = config_report(&config);

        let kinds: Vec<_> = report["exchanges"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["kind"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, vec!["binance", "gateio"]);
        assert_eq!(report["exchanges"][0]["threshold_pct"], "7");
        assert_eq!(report["exchanges"][1]["pacing_ms"], 60);
        assert_eq!(report["notifications"]["log"], true);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = execute_config("/nonexistent/wickscan/config.toml");
        assert!(matches!(
            result,
            Err(crate::error::Error::Config(crate::error::ConfigError::ReadFile(_)))
        ));
    }
}
