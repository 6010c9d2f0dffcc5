//! Handler for the `scan` command.

use std::sync::Arc;

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::ScanArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::clock::SystemClock;
use crate::domain::scan::ScanCycle;
use crate::domain::signal::Signal;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::orchestration::ScanLoop;
use crate::port::outbound::clock::Clock;

#[derive(Tabled)]
struct SignalRow {
    #[tabled(rename = "Exchange")]
    exchange: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Move %")]
    magnitude: String,
    #[tabled(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    low: String,
    #[tabled(rename = "Close")]
    close: String,
    #[tabled(rename = "Bar (UTC)")]
    bar: String,
}

impl From<&Signal> for SignalRow {
    fn from(signal: &Signal) -> Self {
        let candle = &signal.candle;
        Self {
            exchange: signal.instrument.exchange().to_string(),
            symbol: signal.instrument.ticker().into_owned(),
            direction: signal.direction.to_string(),
            magnitude: signal.magnitude_pct.round_dp(2).to_string(),
            open: candle.open().to_string(),
            high: candle.high().to_string(),
            low: candle.low().to_string(),
            close: candle.close().to_string(),
            bar: candle.open_time().format("%H:%M").to_string(),
        }
    }
}

/// Execute the scan command.
pub async fn execute(args: &ScanArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    config.init_logging();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut scan_loop = ScanLoop::from_config(&config, Arc::clone(&clock), args.exchange)?;

    let pb = output::spinner("Loading instrument lists...");
    scan_loop.prime().await;
    pb.set_message("Scanning...");
    let cycles = scan_loop.scan(clock.now()).await;

    let scanned: usize = cycles.iter().map(|c| c.instruments_scanned).sum();
    let failures: usize = cycles.iter().map(|c| c.errors.len()).sum();
    if scanned == 0 && failures > 0 {
        output::spinner_fail(&pb, "No instruments could be scanned");
    } else {
        output::spinner_success(&pb, &format!("Scanned {scanned} instruments"));
    }

    if output::is_json() {
        output::json_output(cycles_json(&cycles));
    } else {
        print_cycles(&cycles);
    }

    if args.notify {
        scan_loop.publish(&cycles).await;
        output::success(&format!(
            "Published to {}",
            scan_loop.dispatcher().channel_names().join(", ")
        ));
    }
    Ok(())
}

fn print_cycles(cycles: &[ScanCycle]) {
    let signals: Vec<SignalRow> = cycles
        .iter()
        .flat_map(|cycle| cycle.signals.iter().map(SignalRow::from))
        .collect();

    output::section("Signals");
    if signals.is_empty() {
        output::lines(&output::muted("No instrument crossed its threshold"));
    } else {
        output::lines(&Table::new(signals).to_string());
    }

    for cycle in cycles {
        if cycle.errors.is_empty() {
            continue;
        }
        output::warning(&failure_summary(cycle));
        if output::verbosity() > 0 {
            for err in &cycle.errors {
                let target = err
                    .instrument
                    .as_ref()
                    .map_or_else(|| "registry".to_string(), ToString::to_string);
                output::field(&err.kind.to_string(), format!("{target}: {}", err.message));
            }
        }
    }
    if !output::is_quiet() && output::verbosity() == 0 && cycles.iter().any(|c| !c.errors.is_empty()) {
        output::hint("use -v to list the failures");
    }
}

fn failure_summary(cycle: &ScanCycle) -> String {
    let failed = cycle.errors.iter().filter(|e| e.instrument.is_some()).count();
    let mut summary = format!(
        "{}: {failed} of {} instruments failed",
        cycle.exchange, cycle.instruments_scanned
    );
    if cycle.errors.iter().any(|e| e.instrument.is_none()) {
        summary.push_str(", instrument list refresh failed");
    }
    summary
}

fn cycles_json(cycles: &[ScanCycle]) -> serde_json::Value {
    let cycles: Vec<_> = cycles
        .iter()
        .map(|cycle| {
            let signals: Vec<_> = cycle
                .signals
                .iter()
                .map(|signal| {
                    json!({
                        "symbol": signal.instrument.symbol(),
                        "direction": signal.direction,
                        "magnitude_pct": signal.magnitude_pct.round_dp(2).to_string(),
                        "open_time": signal.candle.open_time(),
                    })
                })
                .collect();
            let errors: Vec<_> = cycle
                .errors
                .iter()
                .map(|err| {
                    json!({
                        "instrument": err.instrument.as_ref().map(|i| i.symbol().to_string()),
                        "kind": err.kind.to_string(),
                        "message": err.message,
                    })
                })
                .collect();
            json!({
                "cycle_id": cycle.cycle_id,
                "exchange": cycle.exchange.as_str(),
                "scheduled_at": cycle.scheduled_at,
                "completed_at": cycle.completed_at,
                "instruments_scanned": cycle.instruments_scanned,
                "signals": signals,
                "errors": errors,
            })
        })
        .collect();
    json!({ "command": "scan", "cycles": cycles })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::domain::id::{ExchangeId, Instrument};
    use crate::domain::scan::{ScanError, ScanErrorKind};
    use crate::testkit::domain::signal_for;

    fn cycle() -> ScanCycle {
        let at = Utc.with_ymd_and_hms(2025, 5, 8, 10, 5, 0).unwrap();
        let mut cycle = ScanCycle::begin(ExchangeId::Bybit, at);
        cycle.instruments_scanned = 2;
        cycle.signals = vec![signal_for(Instrument::new(ExchangeId::Bybit, "SOLUSDT"), dec!(13.6364))];
        cycle.errors = vec![ScanError {
            instrument: Some(Instrument::new(ExchangeId::Bybit, "XUSDT")),
            kind: ScanErrorKind::Timeout,
            message: "timed out".to_string(),
        }];
        cycle
    }

    #[test]
    fn row_rounds_magnitude() {
        let cycle = cycle();
        let row = SignalRow::from(&cycle.signals[0]);
        assert_eq!(row.exchange, "Bybit");
        assert_eq!(row.symbol, "SOLUSDT");
        assert_eq!(row.magnitude, "13.64");
    }

    #[test]
    fn json_carries_signals_and_errors() {
        let value = cycles_json(&[cycle()]);
        let cycle = &value["cycles"][0];
        assert_eq!(cycle["exchange"], "bybit");
        assert_eq!(cycle["instruments_scanned"], 2);
        assert_eq!(cycle["signals"][0]["symbol"], "SOLUSDT");
        assert_eq!(cycle["signals"][0]["magnitude_pct"], "13.64");
        assert_eq!(cycle["errors"][0]["kind"], "timeout");
        assert_eq!(cycle["errors"][0]["instrument"], "XUSDT");
    }

    #[test]
    fn failure_summary_counts_instruments_only() {
        let mut cycle = cycle();
        cycle.instruments_scanned = 3;
        assert_eq!(failure_summary(&cycle), "Bybit: 1 of 3 instruments failed");

        cycle.errors.push(ScanError {
            instrument: None,
            kind: ScanErrorKind::Registry,
            message: "maintenance".to_string(),
        });
        assert_eq!(
            failure_summary(&cycle),
            "Bybit: 1 of 3 instruments failed, instrument list refresh failed"
        );
    }
}
