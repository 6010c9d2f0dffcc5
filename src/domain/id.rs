//! Domain identifier types with proper encapsulation.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported exchange venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeId {
    /// Binance USD-M futures.
    Binance,
    /// Bybit linear perpetuals.
    Bybit,
    /// Gate.io USDT-settled futures.
    Gateio,
}

impl ExchangeId {
    /// All venues, in display order.
    pub const ALL: [ExchangeId; 3] = [Self::Binance, Self::Bybit, Self::Gateio];

    /// Lowercase config key for this venue.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::Bybit => "bybit",
            Self::Gateio => "gateio",
        }
    }

    /// Human-readable venue name used in alert titles.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Binance => "Binance",
            Self::Bybit => "Bybit",
            Self::Gateio => "Gate.io",
        }
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ExchangeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['.', '-', '_'], "").as_str() {
            "binance" => Ok(Self::Binance),
            "bybit" => Ok(Self::Bybit),
            "gateio" | "gate" => Ok(Self::Gateio),
            other => Err(format!("unknown exchange '{other}'")),
        }
    }
}

/// Exchange-qualified tradable instrument.
///
/// The symbol is kept in the exchange's native spelling (`BTCUSDT` on
/// Binance, `BTC_USDT` on Gate.io) so it can be sent straight back to the
/// candle endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Instrument {
    exchange: ExchangeId,
    symbol: String,
}

impl Instrument {
    /// Create a new instrument on the given exchange.
    pub fn new(exchange: ExchangeId, symbol: impl Into<String>) -> Self {
        Self {
            exchange,
            symbol: symbol.into(),
        }
    }

    /// The venue this instrument trades on.
    #[must_use]
    pub const fn exchange(&self) -> ExchangeId {
        self.exchange
    }

    /// Native ticker as returned by the exchange.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Ticker as shown in alerts. Gate.io contracts drop their `_` separator.
    #[must_use]
    pub fn ticker(&self) -> Cow<'_, str> {
        match self.exchange {
            ExchangeId::Gateio => Cow::Owned(self.symbol.replace('_', "")),
            ExchangeId::Binance | ExchangeId::Bybit => Cow::Borrowed(&self.symbol),
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.exchange.as_str(), self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_id_parses_common_spellings() {
        assert_eq!("binance".parse::<ExchangeId>(), Ok(ExchangeId::Binance));
        assert_eq!("Bybit".parse::<ExchangeId>(), Ok(ExchangeId::Bybit));
        assert_eq!("gate.io".parse::<ExchangeId>(), Ok(ExchangeId::Gateio));
        assert_eq!("gate_io".parse::<ExchangeId>(), Ok(ExchangeId::Gateio));
        assert!("kraken".parse::<ExchangeId>().is_err());
    }

    #[test]
    fn exchange_id_display_uses_venue_name() {
        assert_eq!(ExchangeId::Gateio.to_string(), "Gate.io");
        assert_eq!(ExchangeId::Gateio.as_str(), "gateio");
    }

    #[test]
    fn instrument_display_is_exchange_qualified() {
        let instrument = Instrument::new(ExchangeId::Binance, "ETHUSDT");
        assert_eq!(instrument.to_string(), "binance:ETHUSDT");
        assert_eq!(instrument.symbol(), "ETHUSDT");
        assert_eq!(instrument.exchange(), ExchangeId::Binance);
    }

    #[test]
    fn same_symbol_on_different_exchanges_is_distinct() {
        let a = Instrument::new(ExchangeId::Binance, "BTCUSDT");
        let b = Instrument::new(ExchangeId::Bybit, "BTCUSDT");
        assert_ne!(a, b);
    }

    #[test]
    fn ticker_strips_gateio_separator_only() {
        let contract = Instrument::new(ExchangeId::Gateio, "BTC_USDT");
        assert_eq!(contract.ticker(), "BTCUSDT");
        assert_eq!(contract.symbol(), "BTC_USDT");
        assert_eq!(Instrument::new(ExchangeId::Bybit, "BTCUSDT").ticker(), "BTCUSDT");
    }
}
