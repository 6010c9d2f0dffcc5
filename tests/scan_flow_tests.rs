//! End-to-end scan flow: registry, fan-out, ranking, dedup, dispatch.

mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use support::venue::{coordinator, dispatcher, scan_time, venue};
use wickscan::application::dedup::DedupTracker;
use wickscan::domain::alert::{Alert, AlertKind};
use wickscan::domain::id::{ExchangeId, Instrument};
use wickscan::domain::scan::ScanErrorKind;
use wickscan::domain::schedule::ResetSchedule;
use wickscan::domain::signal::Direction;
use wickscan::infrastructure::orchestration::ScanLoop;
use wickscan::port::Clock;
use wickscan::testkit::clock::FixedClock;
use wickscan::testkit::notifier::RecordingChannel;

fn fixed_clock() -> (Arc<FixedClock>, Arc<dyn Clock>) {
    let fixed = Arc::new(FixedClock::new(scan_time()));
    let clock: Arc<dyn Clock> = fixed.clone();
    (fixed, clock)
}

#[tokio::test]
async fn wick_retracement_produces_one_ranked_alert() {
    let binance = venue(
        ExchangeId::Binance,
        &[
            ("ETHUSDT", [dec!(100), dec!(101), dec!(99), dec!(100.5)]),
            ("BTCUSDT", [dec!(100), dec!(110), dec!(94), dec!(95)]),
            ("SOLUSDT", [dec!(20), dec!(25), dec!(20), dec!(24)]),
        ],
    );
    let (_, clock) = fixed_clock();
    let dedup = DedupTracker::new(ResetSchedule::default(), scan_time());
    let channel = Arc::new(RecordingChannel::new("recording"));
    let mut scan_loop = ScanLoop::new(
        vec![coordinator(binance, dec!(7), Duration::ZERO, &clock, &dedup)],
        dispatcher(&channel),
        dedup,
        clock,
        5,
    );
    scan_loop.prime().await;

    let cycles = scan_loop.run_once().await;

    let cycle = &cycles[0];
    assert_eq!(cycle.instruments_scanned, 3);
    assert!(cycle.errors.is_empty());
    assert!(cycle.registry_delta.is_empty());

    let ranked: Vec<_> = cycle
        .signals
        .iter()
        .map(|s| (s.instrument.symbol().to_string(), s.direction))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("SOLUSDT".to_string(), Direction::Bullish),
            ("BTCUSDT".to_string(), Direction::Bearish),
        ]
    );

    assert_eq!(
        channel.alerts(),
        vec![Alert::new(
            AlertKind::Volatility,
            "Binance volatility",
            "SOLUSDT: bullish 20.00%, BTCUSDT: bearish 13.64%",
        )]
    );
}

#[tokio::test]
async fn repeat_signal_is_suppressed_until_the_window_resets() {
    let bybit = venue(
        ExchangeId::Bybit,
        &[("BTCUSDT", [dec!(100), dec!(110), dec!(94), dec!(95)])],
    );
    let (fixed, clock) = fixed_clock();
    let dedup = DedupTracker::new(ResetSchedule::default(), scan_time());
    let channel = Arc::new(RecordingChannel::new("recording"));
    let mut scan_loop = ScanLoop::new(
        vec![coordinator(bybit, dec!(8), Duration::ZERO, &clock, &dedup)],
        dispatcher(&channel),
        dedup,
        clock,
        5,
    );
    scan_loop.prime().await;

    let first = scan_loop.run_once().await;
    assert_eq!(first[0].alerts.len(), 1);
    assert_eq!(channel.len(), 1);

    fixed.advance(chrono::Duration::minutes(5));
    let second = scan_loop.run_once().await;
    assert_eq!(second[0].signals.len(), 1);
    assert!(second[0].alerts.is_empty());
    assert_eq!(second[0].suppressed().count(), 1);
    assert_eq!(channel.len(), 1);

    fixed.set(Utc.with_ymd_and_hms(2025, 5, 8, 12, 0, 1).unwrap());
    let third = scan_loop.run_once().await;
    assert_eq!(third[0].alerts.len(), 1);
    assert_eq!(channel.len(), 2);
}

#[tokio::test]
async fn failing_instruments_do_not_abort_the_cycle() {
    let gateio = venue(
        ExchangeId::Gateio,
        &[
            ("BTC_USDT", [dec!(100), dec!(110), dec!(94), dec!(95)]),
            ("ETH_USDT", [dec!(100), dec!(110), dec!(94), dec!(95)]),
            ("XRP_USDT", [dec!(100), dec!(110), dec!(94), dec!(95)]),
        ],
    );
    gateio.fail_candles(Instrument::new(ExchangeId::Gateio, "ETH_USDT"), 503);
    gateio.malformed_candles(Instrument::new(ExchangeId::Gateio, "XRP_USDT"), "{\"label\":\"INVALID\"}");

    let (_, clock) = fixed_clock();
    let dedup = DedupTracker::new(ResetSchedule::default(), scan_time());
    let channel = Arc::new(RecordingChannel::new("recording"));
    let mut scan_loop = ScanLoop::new(
        vec![coordinator(gateio, dec!(8), Duration::ZERO, &clock, &dedup)],
        dispatcher(&channel),
        dedup,
        clock,
        5,
    );
    scan_loop.prime().await;

    let cycles = scan_loop.run_once().await;

    let cycle = &cycles[0];
    let kinds: Vec<_> = cycle.errors.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ScanErrorKind::Network, ScanErrorKind::Malformed]);
    assert_eq!(cycle.signals.len(), 1);
    assert_eq!(channel.alerts()[0].body, "BTCUSDT: bearish 13.64%");
}

#[tokio::test]
async fn new_listings_alert_precedes_volatility() {
    let binance = venue(
        ExchangeId::Binance,
        &[("BTCUSDT", [dec!(100), dec!(110), dec!(94), dec!(95)])],
    );
    let (_, clock) = fixed_clock();
    let dedup = DedupTracker::new(ResetSchedule::default(), scan_time());
    let channel = Arc::new(RecordingChannel::new("recording"));
    let mut scan_loop = ScanLoop::new(
        vec![coordinator(binance.clone(), dec!(7), Duration::ZERO, &clock, &dedup)],
        dispatcher(&channel),
        dedup,
        clock,
        5,
    );
    scan_loop.prime().await;

    let pepe = Instrument::new(ExchangeId::Binance, "1000PEPEUSDT");
    binance.set_instruments(vec![Instrument::new(ExchangeId::Binance, "BTCUSDT"), pepe.clone()]);
    binance.set_candles(
        pepe.clone(),
        support::venue::closed_and_forming(&pepe, [dec!(1), dec!(1.01), dec!(0.99), dec!(1)]),
    );

    let cycles = scan_loop.run_once().await;

    assert_eq!(cycles[0].registry_delta, vec![pepe]);
    let kinds: Vec<_> = channel.alerts().into_iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![AlertKind::NewListings, AlertKind::Volatility]);
    assert_eq!(channel.alerts()[0].body, "1000PEPEUSDT");

    let again = scan_loop.run_once().await;
    assert!(again[0].registry_delta.is_empty());
}

#[tokio::test]
async fn one_exchange_outage_leaves_others_scanning() {
    let bybit = venue(
        ExchangeId::Bybit,
        &[("BTCUSDT", [dec!(100), dec!(110), dec!(94), dec!(95)])],
    );
    bybit.fail_instruments("system maintenance");
    let gateio = venue(
        ExchangeId::Gateio,
        &[("BTC_USDT", [dec!(100), dec!(110), dec!(94), dec!(95)])],
    );

    let (_, clock) = fixed_clock();
    let dedup = DedupTracker::new(ResetSchedule::default(), scan_time());
    let channel = Arc::new(RecordingChannel::new("recording"));
    let mut scan_loop = ScanLoop::new(
        vec![
            coordinator(bybit, dec!(8), Duration::ZERO, &clock, &dedup),
            coordinator(gateio, dec!(8), Duration::ZERO, &clock, &dedup),
        ],
        dispatcher(&channel),
        dedup,
        clock,
        5,
    );
    scan_loop.prime().await;

    let cycles = scan_loop.run_once().await;

    assert_eq!(cycles[0].exchange, ExchangeId::Bybit);
    assert_eq!(cycles[0].instruments_scanned, 0);
    assert_eq!(cycles[0].errors[0].kind, ScanErrorKind::Registry);
    assert_eq!(cycles[1].instruments_scanned, 1);

    let titles: Vec<_> = channel.alerts().into_iter().map(|a| a.title).collect();
    assert_eq!(titles, vec!["Gate.io volatility"]);
}

#[tokio::test(start_paused = true)]
async fn paced_exchange_spaces_fetch_submissions() {
    let gateio = venue(
        ExchangeId::Gateio,
        &[
            ("A_USDT", [dec!(1), dec!(1), dec!(1), dec!(1)]),
            ("B_USDT", [dec!(1), dec!(1), dec!(1), dec!(1)]),
            ("C_USDT", [dec!(1), dec!(1), dec!(1), dec!(1)]),
        ],
    );
    let (_, clock) = fixed_clock();
    let dedup = DedupTracker::new(ResetSchedule::default(), scan_time());
    let mut coordinator = coordinator(gateio.clone(), dec!(8), Duration::from_millis(60), &clock, &dedup);
    coordinator.prime().await.unwrap();

    let cycle = coordinator.run_cycle(scan_time()).await;

    assert!(cycle.errors.is_empty());
    let fetches = gateio.fetches();
    assert_eq!(fetches.len(), 3);
    for pair in fetches.windows(2) {
        assert!(pair[1].1.duration_since(pair[0].1) >= Duration::from_millis(60));
    }
}

#[tokio::test(start_paused = true)]
async fn slow_instrument_times_out_without_stalling_the_rest() {
    let binance = venue(
        ExchangeId::Binance,
        &[
            ("SLOWUSDT", [dec!(100), dec!(110), dec!(94), dec!(95)]),
            ("BTCUSDT", [dec!(100), dec!(110), dec!(94), dec!(95)]),
        ],
    );
    binance.delay_candles(Instrument::new(ExchangeId::Binance, "SLOWUSDT"), Duration::from_secs(30));
    let (_, clock) = fixed_clock();
    let dedup = DedupTracker::new(ResetSchedule::default(), scan_time());
    let mut coordinator = coordinator(binance, dec!(7), Duration::ZERO, &clock, &dedup);
    coordinator.prime().await.unwrap();

    let cycle = coordinator.run_cycle(scan_time()).await;

    assert_eq!(cycle.errors.len(), 1);
    assert_eq!(cycle.errors[0].kind, ScanErrorKind::Timeout);
    assert_eq!(cycle.alerts.len(), 1);
    assert_eq!(cycle.alerts[0].instrument.symbol(), "BTCUSDT");
}
