//! Per-exchange instrument registry with new-listing detection.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::id::Instrument;
use crate::error::ExchangeError;
use crate::port::outbound::exchange::ExchangeAdapter;

/// Outcome of one [`SymbolRegistry::refresh`].
#[derive(Debug)]
pub struct RegistryRefresh {
    /// Instruments to scan this cycle, in exchange listing order.
    pub current: Vec<Instrument>,
    /// Instruments not seen before, sorted.
    pub added: Vec<Instrument>,
    /// Set when the list fetch failed and the previous set was kept.
    pub error: Option<ExchangeError>,
}

/// Known instruments for one exchange.
///
/// The first successful load is the baseline and reports nothing as added.
pub struct SymbolRegistry {
    adapter: Arc<dyn ExchangeAdapter>,
    current: Vec<Instrument>,
    seen: HashSet<Instrument>,
    primed: bool,
}

impl SymbolRegistry {
    #[must_use]
    pub fn new(adapter: Arc<dyn ExchangeAdapter>) -> Self {
        Self {
            adapter,
            current: Vec::new(),
            seen: HashSet::new(),
            primed: false,
        }
    }

    #[must_use]
    pub const fn is_primed(&self) -> bool {
        self.primed
    }

    #[must_use]
    pub fn instruments(&self) -> &[Instrument] {
        &self.current
    }

    /// Load the baseline instrument set.
    pub async fn prime(&mut self) -> Result<usize, ExchangeError> {
        let listed = unique(self.adapter.list_instruments().await?);
        self.seen.extend(listed.iter().cloned());
        self.current = listed;
        self.primed = true;
        info!(
            exchange = %self.adapter.exchange(),
            instruments = self.current.len(),
            "Instrument registry primed"
        );
        Ok(self.current.len())
    }

    /// Re-fetch the instrument list and report additions.
    ///
    /// On failure the previous set is returned unchanged with nothing added.
    /// An unprimed registry treats a successful refresh as its baseline.
    pub async fn refresh(&mut self) -> RegistryRefresh {
        let exchange = self.adapter.exchange();

        let listed = match self.adapter.list_instruments().await {
            Ok(listed) => unique(listed),
            Err(err) => {
                warn!(%exchange, error = %err, "Instrument list refresh failed, keeping previous set");
                return RegistryRefresh {
                    current: self.current.clone(),
                    added: Vec::new(),
                    error: Some(err),
                };
            }
        };

        let mut added: Vec<Instrument> = if self.primed {
            listed
                .iter()
                .filter(|i| !self.seen.contains(*i))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };
        added.sort();
        added.dedup();

        self.seen.extend(listed.iter().cloned());
        self.current = listed;
        self.primed = true;

        if added.is_empty() {
            debug!(%exchange, instruments = self.current.len(), "Instrument list refreshed");
        } else {
            info!(%exchange, added = added.len(), "New instruments listed");
        }

        RegistryRefresh {
            current: self.current.clone(),
            added,
            error: None,
        }
    }
}

/// Drop repeated instruments, keeping the first occurrence.
fn unique(listed: Vec<Instrument>) -> Vec<Instrument> {
    let mut seen = HashSet::with_capacity(listed.len());
    listed.into_iter().filter(|i| seen.insert(i.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::ExchangeId;
    use crate::testkit::exchange::ScriptedExchange;

    fn inst(symbol: &str) -> Instrument {
        Instrument::new(ExchangeId::Bybit, symbol)
    }

    #[tokio::test]
    async fn first_load_is_baseline() {
        let exchange = Arc::new(ScriptedExchange::new(ExchangeId::Bybit));
        exchange.set_instruments(vec![inst("BTCUSDT"), inst("ETHUSDT")]);
        let mut registry = SymbolRegistry::new(exchange);

        let refresh = registry.refresh().await;
        assert_eq!(refresh.current.len(), 2);
        assert!(refresh.added.is_empty());
        assert!(registry.is_primed());
    }

    #[tokio::test]
    async fn additions_are_reported_once_and_sorted() {
        let exchange = Arc::new(ScriptedExchange::new(ExchangeId::Bybit));
        exchange.set_instruments(vec![inst("BTCUSDT")]);
        let mut registry = SymbolRegistry::new(exchange.clone());
        registry.prime().await.unwrap();

        exchange.set_instruments(vec![inst("BTCUSDT"), inst("WIFUSDT"), inst("ARBUSDT")]);
        let refresh = registry.refresh().await;
        assert_eq!(refresh.added, vec![inst("ARBUSDT"), inst("WIFUSDT")]);

        let refresh = registry.refresh().await;
        assert!(refresh.added.is_empty());
        assert_eq!(refresh.current.len(), 3);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_set() {
        let exchange = Arc::new(ScriptedExchange::new(ExchangeId::Bybit));
        exchange.set_instruments(vec![inst("BTCUSDT"), inst("ETHUSDT")]);
        let mut registry = SymbolRegistry::new(exchange.clone());
        registry.prime().await.unwrap();

        exchange.fail_instruments("exchange maintenance");
        let refresh = registry.refresh().await;
        assert!(refresh.error.is_some());
        assert!(refresh.added.is_empty());
        assert_eq!(refresh.current, vec![inst("BTCUSDT"), inst("ETHUSDT")]);
    }

    #[tokio::test]
    async fn delisted_symbols_drop_out_on_successful_refresh() {
        let exchange = Arc::new(ScriptedExchange::new(ExchangeId::Bybit));
        exchange.set_instruments(vec![inst("BTCUSDT"), inst("LUNAUSDT")]);
        let mut registry = SymbolRegistry::new(exchange.clone());
        registry.prime().await.unwrap();

        exchange.set_instruments(vec![inst("BTCUSDT")]);
        let refresh = registry.refresh().await;
        assert_eq!(refresh.current, vec![inst("BTCUSDT")]);

        // Relisting an instrument seen earlier in this run is not news.
        exchange.set_instruments(vec![inst("BTCUSDT"), inst("LUNAUSDT")]);
        assert!(registry.refresh().await.added.is_empty());
    }

    #[tokio::test]
    async fn repeated_listing_entries_are_scanned_once() {
        let exchange = Arc::new(ScriptedExchange::new(ExchangeId::Bybit));
        exchange.set_instruments(vec![inst("SOLUSDT"), inst("BTCUSDT"), inst("SOLUSDT")]);
        let mut registry = SymbolRegistry::new(exchange.clone());
        assert_eq!(registry.prime().await.unwrap(), 2);
        assert_eq!(registry.instruments(), &[inst("SOLUSDT"), inst("BTCUSDT")]);

        exchange.set_instruments(vec![inst("SOLUSDT"), inst("WIFUSDT"), inst("WIFUSDT"), inst("SOLUSDT")]);
        let refresh = registry.refresh().await;
        assert_eq!(refresh.current, vec![inst("SOLUSDT"), inst("WIFUSDT")]);
        assert_eq!(refresh.added, vec![inst("WIFUSDT")]);
    }
}
