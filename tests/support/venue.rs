use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use wickscan::application::dedup::DedupTracker;
use wickscan::application::dispatch::NotificationDispatcher;
use wickscan::application::scanner::{ScanCoordinator, ScanSettings};
use wickscan::domain::candle::Candle;
use wickscan::domain::id::{ExchangeId, Instrument};
use wickscan::port::Clock;
use wickscan::testkit::domain::bar;
use wickscan::testkit::exchange::ScriptedExchange;
use wickscan::testkit::notifier::RecordingChannel;

/// One second after the 10:05 UTC boundary.
pub fn scan_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 8, 10, 5, 1).unwrap()
}

/// The 10:00 bar (closed at [`scan_time`]) followed by the forming 10:05
/// bar, both with the same prices.
pub fn closed_and_forming(instrument: &Instrument, ohlc: [Decimal; 4]) -> Vec<Candle> {
    vec![
        bar(
            instrument.clone(),
            Utc.with_ymd_and_hms(2025, 5, 8, 10, 0, 0).unwrap(),
            ohlc,
        ),
        bar(
            instrument.clone(),
            Utc.with_ymd_and_hms(2025, 5, 8, 10, 5, 0).unwrap(),
            ohlc,
        ),
    ]
}

/// A scripted exchange listing `entries` in order, each with a closed bar.
pub fn venue(kind: ExchangeId, entries: &[(&str, [Decimal; 4])]) -> Arc<ScriptedExchange> {
    let exchange = Arc::new(ScriptedExchange::new(kind));
    let mut instruments = Vec::new();
    for (symbol, ohlc) in entries {
        let instrument = Instrument::new(kind, *symbol);
        exchange.set_candles(instrument.clone(), closed_and_forming(&instrument, *ohlc));
        instruments.push(instrument);
    }
    exchange.set_instruments(instruments);
    exchange
}

pub fn coordinator(
    exchange: Arc<ScriptedExchange>,
    threshold_pct: Decimal,
    pacing: Duration,
    clock: &Arc<dyn Clock>,
    dedup: &DedupTracker,
) -> ScanCoordinator {
    ScanCoordinator::new(
        exchange,
        ScanSettings {
            threshold_pct,
            pacing,
            fetch_timeout: Duration::from_secs(5),
        },
        Arc::clone(clock),
        dedup.clone(),
    )
}

pub fn dispatcher(channel: &Arc<RecordingChannel>) -> NotificationDispatcher {
    let mut dispatcher = NotificationDispatcher::new(Duration::from_secs(1));
    dispatcher.register(Arc::clone(channel) as Arc<dyn wickscan::port::AlertChannel>);
    dispatcher
}
