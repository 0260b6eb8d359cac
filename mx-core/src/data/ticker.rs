//! Ticker snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Timestamp;

/// A point-in-time market snapshot. No history is kept between fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// Canonical symbol
    pub symbol: Option<String>,
    /// Snapshot time
    pub timestamp: Option<Timestamp>,
    /// Best bid price
    pub bid: Option<Decimal>,
    /// Best ask price
    pub ask: Option<Decimal>,
    /// Last traded price
    pub last: Option<Decimal>,
    /// Same as `last`
    pub close: Option<Decimal>,
    /// Opening price of the rolling window
    pub open: Option<Decimal>,
    /// Highest price of the rolling window
    pub high: Option<Decimal>,
    /// Lowest price of the rolling window
    pub low: Option<Decimal>,
    /// `last - open`
    pub change: Option<Decimal>,
    /// `change / open × 100`
    pub percentage: Option<Decimal>,
    /// `(last + open) / 2`
    pub average: Option<Decimal>,
    /// Volume in base currency
    pub base_volume: Option<Decimal>,
    /// Raw exchange payload
    pub info: Value,
}

impl Ticker {
    /// Computes `change`, `percentage` and `average` from `last` and `open`.
    ///
    /// `percentage` is left unset when `open` is zero; a field whose
    /// arithmetic overflows is left unset.
    #[must_use]
    pub fn with_derived_fields(mut self) -> Self {
        if let (Some(last), Some(open)) = (self.last, self.open) {
            self.change = last.checked_sub(open);
            self.average = last
                .checked_add(open)
                .and_then(|sum| sum.checked_div(Decimal::TWO));
            if !open.is_zero() {
                self.percentage = self
                    .change
                    .and_then(|change| change.checked_div(open))
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
            }
        }
        self
    }

    /// Returns the ISO-8601 snapshot time.
    #[must_use]
    pub fn datetime(&self) -> Option<String> {
        self.timestamp.and_then(|ts| ts.to_iso8601())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ticker(last: Option<Decimal>, open: Option<Decimal>) -> Ticker {
        Ticker {
            symbol: Some("MTL/BTC".to_string()),
            timestamp: None,
            bid: None,
            ask: None,
            last,
            close: last,
            open,
            high: None,
            low: None,
            change: None,
            percentage: None,
            average: None,
            base_volume: None,
            info: Value::Null,
        }
    }

    #[test]
    fn test_derived_fields() {
        let t = ticker(Some(dec!(110)), Some(dec!(100))).with_derived_fields();
        assert_eq!(t.change, Some(dec!(10)));
        assert_eq!(t.percentage, Some(dec!(10)));
        assert_eq!(t.average, Some(dec!(105)));
    }

    #[test]
    fn test_zero_open_skips_percentage() {
        let t = ticker(Some(dec!(1)), Some(dec!(0))).with_derived_fields();
        assert_eq!(t.change, Some(dec!(1)));
        assert!(t.percentage.is_none());
    }

    #[test]
    fn test_missing_inputs_leave_fields_unset() {
        let t = ticker(Some(dec!(1)), None).with_derived_fields();
        assert!(t.change.is_none());
        assert!(t.average.is_none());
    }

    #[test]
    fn test_overflowing_inputs_leave_fields_unset() {
        let tiny_open = Decimal::new(1, 28);
        let t = ticker(Some(dec!(1000000)), Some(tiny_open)).with_derived_fields();
        assert!(t.percentage.is_none());

        let t = ticker(Some(Decimal::MAX), Some(Decimal::MIN)).with_derived_fields();
        assert!(t.change.is_none());
        assert!(t.percentage.is_none());
        assert_eq!(t.average, Some(Decimal::ZERO));
    }
}
