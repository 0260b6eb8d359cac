//! Market and currency metadata.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Optional lower and upper bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinMax {
    /// Lower bound, if the exchange reports one
    pub min: Option<Decimal>,
    /// Upper bound, if the exchange reports one
    pub max: Option<Decimal>,
}

impl MinMax {
    /// Creates a bound with only a minimum.
    #[must_use]
    pub const fn min(min: Decimal) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Returns true if neither bound is set.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Decimal places used for amounts and prices on a market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketPrecision {
    /// Decimal places for order amounts
    pub amount: Option<u32>,
    /// Decimal places for order prices
    pub price: Option<u32>,
}

/// Trading limits for a market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketLimits {
    /// Order amount bounds
    pub amount: MinMax,
    /// Order price bounds
    pub price: MinMax,
    /// Order cost (price × amount) bounds
    pub cost: MinMax,
}

/// A tradable pair.
///
/// `id` is the exchange-native identifier used in every outbound request;
/// `symbol` is always `base + "/" + quote`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Exchange-native identifier (e.g. `MTLBTC`)
    pub id: String,
    /// Canonical symbol (e.g. `MTL/BTC`)
    pub symbol: String,
    /// Base currency code
    pub base: String,
    /// Quote currency code
    pub quote: String,
    /// Exchange-native base asset id
    pub base_id: String,
    /// Exchange-native quote asset id
    pub quote_id: String,
    /// Amount and price precision
    pub precision: MarketPrecision,
    /// Trading limits
    pub limits: MarketLimits,
    /// Whether the market is currently tradable
    pub active: bool,
    /// Raw exchange payload
    pub info: Value,
}

impl Market {
    /// Derives the canonical symbol from base and quote codes.
    #[must_use]
    pub fn symbol_for(base: &str, quote: &str) -> String {
        format!("{base}/{quote}")
    }
}

/// Withdrawal, amount and price limits for a currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyLimits {
    /// Tradable amount bounds
    pub amount: MinMax,
    /// Price bounds
    pub price: MinMax,
    /// Cost bounds
    pub cost: MinMax,
    /// Withdrawal bounds
    pub withdraw: MinMax,
}

/// A tradable asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    /// Exchange-native identifier
    pub id: String,
    /// Canonical currency code
    pub code: String,
    /// Display name
    pub name: Option<String>,
    /// Whether deposits/withdrawals/trading are enabled
    pub active: bool,
    /// Withdrawal fee
    pub fee: Option<Decimal>,
    /// Decimal places
    pub precision: Option<u32>,
    /// Limits derived from precision
    pub limits: CurrencyLimits,
    /// Raw exchange payload
    pub info: Value,
}

impl Currency {
    /// Returns the smallest representable amount for `precision` decimal places,
    /// i.e. `10^-precision`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mx_core::data::Currency;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Currency::min_amount_for(3), Some(Decimal::new(1, 3)));
    /// ```
    #[must_use]
    pub fn min_amount_for(precision: u32) -> Option<Decimal> {
        Decimal::try_new(1, precision).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_symbol_for() {
        assert_eq!(Market::symbol_for("MTL", "BTC"), "MTL/BTC");
    }

    #[test]
    fn test_min_amount_is_exact_power_of_ten() {
        assert_eq!(Currency::min_amount_for(0), Some(dec!(1)));
        assert_eq!(Currency::min_amount_for(8), Some(dec!(0.00000001)));
        assert_eq!(Currency::min_amount_for(18), Some(dec!(0.000000000000000001)));
    }

    #[test]
    fn test_min_amount_out_of_range() {
        assert_eq!(Currency::min_amount_for(29), None);
    }

    #[test]
    fn test_minmax_unset() {
        assert!(MinMax::default().is_unset());
        assert!(!MinMax::min(dec!(1)).is_unset());
    }
}
