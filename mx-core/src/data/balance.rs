//! Account balances.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::types::Timestamp;

/// Balance of one currency.
///
/// `total` is always `free + locked`; construct through [`Balance::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Available for trading or withdrawal
    pub free: Decimal,
    /// Held by open orders or pending withdrawals
    pub locked: Decimal,
    /// `free + locked`
    pub total: Decimal,
}

impl Balance {
    /// Creates a balance, computing `total`. Returns `None` if the sum
    /// overflows.
    #[must_use]
    pub fn new(free: Decimal, locked: Decimal) -> Option<Self> {
        Some(Self {
            free,
            locked,
            total: free.checked_add(locked)?,
        })
    }
}

/// Balances of every currency on the account, keyed by currency code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balances {
    /// Snapshot time (not reported by the exchange)
    pub timestamp: Option<Timestamp>,
    /// Per-currency balances
    pub balances: BTreeMap<String, Balance>,
    /// Raw exchange payload
    pub info: Value,
}

impl Balances {
    /// Returns the balance of `code`.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Balance> {
        self.balances.get(code)
    }

    /// Returns the free amount of `code`, zero when absent.
    #[must_use]
    pub fn free(&self, code: &str) -> Decimal {
        self.get(code).map_or(Decimal::ZERO, |b| b.free)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_is_free_plus_locked() {
        let balance = Balance::new(dec!(1.5), dec!(0.25)).unwrap();
        assert_eq!(balance.total, dec!(1.75));

        let empty = Balance::new(Decimal::ZERO, Decimal::ZERO).unwrap();
        assert_eq!(empty.total, Decimal::ZERO);
    }

    #[test]
    fn test_total_overflow() {
        assert!(Balance::new(Decimal::MAX, Decimal::ONE).is_none());
    }

    #[test]
    fn test_lookup() {
        let mut balances = BTreeMap::new();
        balances.insert("BTC".to_string(), Balance::new(dec!(2), dec!(1)).unwrap());
        let all = Balances {
            timestamp: None,
            balances,
            info: Value::Null,
        };
        assert_eq!(all.free("BTC"), dec!(2));
        assert_eq!(all.free("ETH"), Decimal::ZERO);
        assert_eq!(all.get("BTC").unwrap().total, dec!(3));
    }
}
