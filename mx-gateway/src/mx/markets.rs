//! Loaded market and currency metadata.

use mx_core::data::{Currency, Market};
use std::collections::HashMap;

/// Immutable lookup tables built from one market load.
///
/// A reload builds a new index and swaps it in whole; an index is never
/// modified after construction.
#[derive(Debug, Clone, Default)]
pub struct MarketIndex {
    markets: Vec<Market>,
    currencies: Vec<Currency>,
    by_symbol: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
    currency_by_code: HashMap<String, usize>,
    currency_by_id: HashMap<String, usize>,
    loaded: bool,
}

impl MarketIndex {
    /// Builds an index. Later duplicates of a symbol or id win.
    #[must_use]
    pub fn new(markets: Vec<Market>, currencies: Vec<Currency>) -> Self {
        let mut by_symbol = HashMap::with_capacity(markets.len());
        let mut by_id = HashMap::with_capacity(markets.len());
        for (i, market) in markets.iter().enumerate() {
            by_symbol.insert(market.symbol.clone(), i);
            by_id.insert(market.id.clone(), i);
        }

        let mut currency_by_code = HashMap::with_capacity(currencies.len());
        let mut currency_by_id = HashMap::with_capacity(currencies.len());
        for (i, currency) in currencies.iter().enumerate() {
            currency_by_code.insert(currency.code.clone(), i);
            currency_by_id.insert(currency.id.to_lowercase(), i);
        }

        Self {
            markets,
            currencies,
            by_symbol,
            by_id,
            currency_by_code,
            currency_by_id,
            loaded: true,
        }
    }

    /// Returns true once markets have been loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// All markets in load order.
    #[must_use]
    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// All currencies in load order.
    #[must_use]
    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// Looks a market up by canonical symbol.
    #[must_use]
    pub fn market(&self, symbol: &str) -> Option<&Market> {
        self.by_symbol.get(symbol).map(|&i| &self.markets[i])
    }

    /// Looks a market up by native id.
    #[must_use]
    pub fn market_by_id(&self, id: &str) -> Option<&Market> {
        self.by_id.get(id).map(|&i| &self.markets[i])
    }

    /// Looks a currency up by code.
    #[must_use]
    pub fn currency(&self, code: &str) -> Option<&Currency> {
        self.currency_by_code.get(code).map(|&i| &self.currencies[i])
    }

    /// Maps a native asset id (any case) to its currency code, or upper-cases
    /// the id when the asset is not loaded.
    #[must_use]
    pub fn currency_code(&self, id: &str) -> String {
        self.currency_by_id
            .get(&id.to_lowercase())
            .map_or_else(|| id.to_uppercase(), |&i| self.currencies[i].code.clone())
    }
}

/// Same mapping as [`MarketIndex::currency_code`], over a plain currency list.
#[must_use]
pub fn currency_code_for(currencies: &[Currency], id: &str) -> String {
    currencies
        .iter()
        .find(|currency| currency.id.eq_ignore_ascii_case(id))
        .map_or_else(|| id.to_uppercase(), |currency| currency.code.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_core::data::{CurrencyLimits, MarketLimits, MarketPrecision};
    use serde_json::Value;

    fn market(id: &str, base: &str, quote: &str) -> Market {
        Market {
            id: id.to_string(),
            symbol: Market::symbol_for(base, quote),
            base: base.to_string(),
            quote: quote.to_string(),
            base_id: base.to_string(),
            quote_id: quote.to_string(),
            precision: MarketPrecision::default(),
            limits: MarketLimits::default(),
            active: true,
            info: Value::Null,
        }
    }

    fn currency(id: &str, code: &str) -> Currency {
        Currency {
            id: id.to_string(),
            code: code.to_string(),
            name: None,
            active: true,
            fee: None,
            precision: None,
            limits: CurrencyLimits::default(),
            info: Value::Null,
        }
    }

    #[test]
    fn test_empty_index_is_not_loaded() {
        let index = MarketIndex::default();
        assert!(!index.is_loaded());
        assert!(index.market("MTL/BTC").is_none());
    }

    #[test]
    fn test_lookups() {
        let index = MarketIndex::new(
            vec![market("MTLBTC", "MTL", "BTC"), market("ETHBTC", "ETH", "BTC")],
            vec![currency("btc", "BTC")],
        );

        assert!(index.is_loaded());
        assert_eq!(index.market("ETH/BTC").unwrap().id, "ETHBTC");
        assert_eq!(index.market_by_id("MTLBTC").unwrap().symbol, "MTL/BTC");
        assert!(index.market_by_id("XXX").is_none());
        assert_eq!(index.currency("BTC").unwrap().id, "btc");
        assert_eq!(index.currency_code("btc"), "BTC");
        assert_eq!(index.currency_code("BTC"), "BTC");
        assert_eq!(index.currency_code("usdt"), "USDT");
        assert_eq!(index.markets().len(), 2);
    }

    #[test]
    fn test_currency_code_for_uses_loaded_code() {
        let currencies = vec![currency("xbt", "BTC")];
        assert_eq!(currency_code_for(&currencies, "XBT"), "BTC");
        assert_eq!(currency_code_for(&currencies, "eth"), "ETH");

        let index = MarketIndex::new(Vec::new(), currencies.clone());
        assert_eq!(index.currency_code("XBT"), currency_code_for(&currencies, "XBT"));
    }
}
