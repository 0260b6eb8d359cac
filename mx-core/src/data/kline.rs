//! Candle (OHLCV) data structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ArgumentError;
use crate::types::Timestamp;

/// Candle interval supported by the exchange.
///
/// # Examples
///
/// ```
/// use mx_core::data::Timeframe;
///
/// let tf: Timeframe = "30m".parse().unwrap();
/// assert_eq!(tf.as_str(), "30m");
/// assert!("2h".parse::<Timeframe>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// 1 minute
    #[serde(rename = "1m")]
    Minute1,
    /// 5 minutes
    #[serde(rename = "5m")]
    Minute5,
    /// 30 minutes
    #[serde(rename = "30m")]
    Minute30,
    /// 1 hour
    #[serde(rename = "1h")]
    Hour1,
    /// 1 day
    #[serde(rename = "1d")]
    Day1,
}

impl Timeframe {
    /// All supported intervals.
    pub const ALL: [Self; 5] = [
        Self::Minute1,
        Self::Minute5,
        Self::Minute30,
        Self::Hour1,
        Self::Day1,
    ];

    /// Returns the interval string sent to the exchange.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute5 => "5m",
            Self::Minute30 => "30m",
            Self::Hour1 => "1h",
            Self::Day1 => "1d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tf| tf.as_str() == s)
            .ok_or_else(|| ArgumentError::UnsupportedTimeframe {
                timeframe: s.to_string(),
            })
    }
}

/// One candle: `[timestamp, open, high, low, close, volume]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ohlcv {
    /// Candle open time
    pub timestamp: Timestamp,
    /// Opening price
    pub open: Decimal,
    /// Highest price
    pub high: Decimal,
    /// Lowest price
    pub low: Decimal,
    /// Closing price
    pub close: Decimal,
    /// Volume in base currency
    pub volume: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported() {
        for tf in Timeframe::ALL {
            assert_eq!(tf.as_str().parse::<Timeframe>().unwrap(), tf);
        }
    }

    #[test]
    fn test_parse_unsupported() {
        let err = "4h".parse::<Timeframe>().unwrap_err();
        assert_eq!(
            err,
            ArgumentError::UnsupportedTimeframe {
                timeframe: "4h".to_string()
            }
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Timeframe::Hour1).unwrap(), "\"1h\"");
    }
}
