//! In-memory exchange adapter for scan tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::domain::candle::Candle;
use crate::domain::id::{ExchangeId, Instrument};
use crate::error::ExchangeError;
use crate::port::outbound::exchange::ExchangeAdapter;

enum CandleScript {
    Bars(Vec<Candle>),
    Status(u16),
    Malformed(String),
}

/// An [`ExchangeAdapter`] whose responses are set by the test.
///
/// Instruments without scripted bars answer with a malformed-response
/// error. Every candle fetch is logged with its (tokio) start instant so
/// pacing can be asserted.
pub struct ScriptedExchange {
    exchange: ExchangeId,
    instruments: Mutex<Result<Vec<Instrument>, String>>,
    candles: Mutex<HashMap<Instrument, CandleScript>>,
    delays: Mutex<HashMap<Instrument, Duration>>,
    fetches: Mutex<Vec<(Instrument, Instant)>>,
    list_calls: AtomicUsize,
}

impl ScriptedExchange {
    pub fn new(exchange: ExchangeId) -> Self {
        Self {
            exchange,
            instruments: Mutex::new(Ok(Vec::new())),
            candles: Mutex::new(HashMap::new()),
            delays: Mutex::new(HashMap::new()),
            fetches: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_instruments(&self, instruments: Vec<Instrument>) {
        *self.instruments.lock() = Ok(instruments);
    }

    /// Make instrument listing fail with an API error.
    pub fn fail_instruments(&self, reason: &str) {
        *self.instruments.lock() = Err(reason.to_string());
    }

    pub fn set_candles(&self, instrument: Instrument, bars: Vec<Candle>) {
        self.candles
            .lock()
            .insert(instrument, CandleScript::Bars(bars));
    }

    /// Make candle fetches for `instrument` fail with an HTTP status.
    pub fn fail_candles(&self, instrument: Instrument, status: u16) {
        self.candles
            .lock()
            .insert(instrument, CandleScript::Status(status));
    }

    /// Make candle fetches for `instrument` return an undecodable payload.
    pub fn malformed_candles(&self, instrument: Instrument, payload: &str) {
        self.candles
            .lock()
            .insert(instrument, CandleScript::Malformed(payload.to_string()));
    }

    /// Delay candle responses for `instrument`.
    pub fn delay_candles(&self, instrument: Instrument, delay: Duration) {
        self.delays.lock().insert(instrument, delay);
    }

    /// Candle fetches in start order.
    pub fn fetches(&self) -> Vec<(Instrument, Instant)> {
        self.fetches.lock().clone()
    }

    pub fn fetch_count(&self, instrument: &Instrument) -> usize {
        self.fetches
            .lock()
            .iter()
            .filter(|(i, _)| i == instrument)
            .count()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeAdapter for ScriptedExchange {
    fn exchange(&self) -> ExchangeId {
        self.exchange
    }

    async fn list_instruments(&self) -> Result<Vec<Instrument>, ExchangeError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.instruments
            .lock()
            .clone()
            .map_err(|message| ExchangeError::Api { code: -1, message })
    }

    async fn fetch_candles(&self, instrument: &Instrument) -> Result<Vec<Candle>, ExchangeError> {
        self.fetches.lock().push((instrument.clone(), Instant::now()));

        let delay = self.delays.lock().get(instrument).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.candles.lock().get(instrument) {
            Some(CandleScript::Bars(bars)) => Ok(bars.clone()),
            Some(CandleScript::Status(status)) => Err(ExchangeError::Status {
                status: *status,
                url: format!("scripted://{instrument}"),
            }),
            Some(CandleScript::Malformed(payload)) => {
                Err(ExchangeError::malformed("scripted malformed payload", payload))
            }
            None => Err(ExchangeError::malformed("no candles scripted", "")),
        }
    }
}
