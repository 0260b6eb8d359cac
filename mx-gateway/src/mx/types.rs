//! MX wire types.
//!
//! Field names follow the exchange's camelCase JSON. Everything the exchange
//! may omit is an `Option`; numeric fields accept either JSON numbers or
//! numeric strings.

#![allow(clippy::doc_markdown)]

use rust_decimal::Decimal;
use serde::Deserialize;

/// `GET exchange-info` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MxExchangeInfo {
    /// Server time in milliseconds
    #[serde(default)]
    pub server_time: Option<i64>,
    /// Market entries
    #[serde(default)]
    pub symbols: Vec<serde_json::Value>,
}

/// One market entry of `exchange-info`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MxSymbol {
    /// Native market id (e.g. `MTLBTC`)
    #[serde(deserialize_with = "de::string")]
    pub symbol: String,
    /// Trading status; `RUNNING` means tradable
    #[serde(default)]
    pub status: Option<String>,
    /// Base asset id
    pub base_asset: String,
    /// Base asset precision
    #[serde(default)]
    pub base_asset_precision: Option<u32>,
    /// Quote asset id
    pub quote_asset: String,
    /// Quote asset precision
    #[serde(default)]
    pub quote_asset_precision: Option<u32>,
    /// Precision of commissions charged in the quote asset
    #[serde(default)]
    pub quote_commission_precision: Option<u32>,
}

/// One entry of `GET assets`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MxAsset {
    /// Native asset id
    #[serde(deserialize_with = "de::string")]
    pub id: String,
    /// Asset code
    #[serde(default, deserialize_with = "de::opt_string")]
    pub code: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the asset is enabled
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Withdrawal fee
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub withdraw_fee: Option<Decimal>,
    /// Decimal places
    #[serde(default)]
    pub precision: Option<u32>,
}

/// One entry of `GET tickers`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MxTicker {
    /// Native market id
    #[serde(default, deserialize_with = "de::opt_string")]
    pub symbol: Option<String>,
    /// Best bid
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub bid_price: Option<Decimal>,
    /// Best ask
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub ask_price: Option<Decimal>,
    /// Last price
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub last_price: Option<Decimal>,
    /// Open price
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub open_price: Option<Decimal>,
    /// High price
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub high_price: Option<Decimal>,
    /// Low price
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub low_price: Option<Decimal>,
    /// Base volume
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub volume: Option<Decimal>,
    /// Snapshot time
    #[serde(default, deserialize_with = "de::opt_millis")]
    pub time: Option<i64>,
}

/// `GET depth` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MxDepth {
    /// Server time of the snapshot
    #[serde(default, deserialize_with = "de::opt_millis")]
    pub server_time: Option<i64>,
    /// Bid levels
    #[serde(default)]
    pub bids: Vec<MxLevel>,
    /// Ask levels
    #[serde(default)]
    pub asks: Vec<MxLevel>,
}

/// One order book level.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MxLevel {
    /// Price
    #[serde(deserialize_with = "de::decimal")]
    pub price: Decimal,
    /// Quantity
    #[serde(deserialize_with = "de::decimal")]
    pub quantity: Decimal,
}

/// Public or private trade.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MxTrade {
    /// Trade id (private only)
    #[serde(default, deserialize_with = "de::opt_string")]
    pub id: Option<String>,
    /// Order id (private only)
    #[serde(default, deserialize_with = "de::opt_string")]
    pub order_id: Option<String>,
    /// Native market id (private only)
    #[serde(default, deserialize_with = "de::opt_string")]
    pub symbol: Option<String>,
    /// `BUY` or `SELL` (private only)
    #[serde(default)]
    pub side: Option<String>,
    /// Execution price
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub price: Option<Decimal>,
    /// Executed quantity
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub quantity: Option<Decimal>,
    /// Fee charged (private only)
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub commission: Option<Decimal>,
    /// Fee asset id (private only)
    #[serde(default, deserialize_with = "de::opt_string")]
    pub commission_asset: Option<String>,
    /// Whether the account was the maker (private only)
    #[serde(default)]
    pub is_maker: Option<bool>,
    /// Execution time
    #[serde(default, deserialize_with = "de::opt_millis")]
    pub time: Option<i64>,
}

/// Order as returned by `orders`, `orders/{orderId}` and `orders/cancel`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MxOrder {
    /// Order id
    #[serde(default, deserialize_with = "de::opt_string")]
    pub order_id: Option<String>,
    /// Native market id
    #[serde(default, deserialize_with = "de::opt_string")]
    pub symbol: Option<String>,
    /// `LIMIT`, `MARKET`, ...
    #[serde(default, rename = "type")]
    pub order_type: Option<String>,
    /// `BUY` or `SELL`
    #[serde(default)]
    pub side: Option<String>,
    /// Limit price (0 for market orders)
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub price: Option<Decimal>,
    /// Ordered quantity
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub quantity: Option<Decimal>,
    /// Executed quantity
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub executed_quantity: Option<Decimal>,
    /// Executed cost in quote asset
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub cumulative_quote_quantity: Option<Decimal>,
    /// Average fill price
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub average_price: Option<Decimal>,
    /// Exchange status string
    #[serde(default)]
    pub status: Option<String>,
    /// Creation time
    #[serde(default, deserialize_with = "de::opt_millis")]
    pub time: Option<i64>,
}

/// `GET account` response.
#[derive(Debug, Clone, Deserialize)]
pub struct MxAccount {
    /// Per-asset balances
    #[serde(default)]
    pub balances: Vec<MxBalance>,
}

/// One asset balance.
#[derive(Debug, Clone, Deserialize)]
pub struct MxBalance {
    /// Asset id
    #[serde(deserialize_with = "de::string")]
    pub asset: String,
    /// Available amount
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub free: Option<Decimal>,
    /// Amount held by orders or withdrawals
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub locked: Option<Decimal>,
}

/// Deposit or withdrawal record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MxTransaction {
    /// Transfer id
    #[serde(default, deserialize_with = "de::opt_string")]
    pub id: Option<String>,
    /// On-chain hash
    #[serde(default, deserialize_with = "de::opt_string")]
    pub tx_id: Option<String>,
    /// Asset id
    #[serde(default, deserialize_with = "de::opt_string")]
    pub asset: Option<String>,
    /// Amount
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub amount: Option<Decimal>,
    /// Network fee
    #[serde(default, deserialize_with = "de::opt_decimal")]
    pub fee: Option<Decimal>,
    /// Address
    #[serde(default, deserialize_with = "de::opt_string")]
    pub address: Option<String>,
    /// Memo / destination tag
    #[serde(default, deserialize_with = "de::opt_string")]
    pub tag: Option<String>,
    /// Exchange status string
    #[serde(default)]
    pub status: Option<String>,
    /// Creation time
    #[serde(default, deserialize_with = "de::opt_millis")]
    pub time: Option<i64>,
}

/// `GET address/deposit` response.
#[derive(Debug, Clone, Deserialize)]
pub struct MxDepositAddress {
    /// Asset id, when echoed back
    #[serde(default, deserialize_with = "de::opt_string")]
    pub asset: Option<String>,
    /// Deposit address
    #[serde(default, deserialize_with = "de::opt_string")]
    pub address: Option<String>,
    /// Memo / destination tag
    #[serde(default, deserialize_with = "de::opt_string")]
    pub tag: Option<String>,
}

/// Error body `{code, message}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MxErrorBody {
    /// Machine-readable code
    #[serde(default, deserialize_with = "de::opt_string")]
    pub code: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
}

/// Lenient deserializers for exchange values.
pub(crate) mod de {
    use rust_decimal::Decimal;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    /// Parses a decimal from a JSON number or numeric string.
    pub fn decimal_from_value(value: &Value) -> Result<Option<Decimal>, String> {
        let text = match value {
            Value::Null => return Ok(None),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            other => return Err(format!("expected a number, got {other}")),
        };

        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map(Some)
            .map_err(|e| format!("invalid decimal '{text}': {e}"))
    }

    /// Parses milliseconds from a JSON integer or integer string.
    pub fn millis_from_value(value: &Value) -> Result<Option<i64>, String> {
        match value {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| format!("invalid timestamp {n}")),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| format!("invalid timestamp '{s}': {e}")),
            other => Err(format!("expected a timestamp, got {other}")),
        }
    }

    pub fn decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decimal_from_value(&value)
            .map_err(D::Error::custom)?
            .ok_or_else(|| D::Error::custom("missing decimal"))
    }

    pub fn opt_decimal<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decimal_from_value(&value).map_err(D::Error::custom)
    }

    pub fn opt_millis<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        millis_from_value(&value).map_err(D::Error::custom)
    }

    /// Ids may arrive as strings or numbers.
    pub fn opt_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) => Ok(Some(n.to_string())),
            other => Err(D::Error::custom(format!("expected a string, got {other}"))),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        opt_string(deserializer)?.ok_or_else(|| D::Error::custom("missing string"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_decimal_accepts_strings_and_numbers() {
        let level: MxLevel =
            serde_json::from_value(json!({"price": "0.0016", "quantity": 2})).unwrap();
        assert_eq!(level.price, dec!(0.0016));
        assert_eq!(level.quantity, dec!(2));

        let level: MxLevel =
            serde_json::from_value(json!({"price": 0.5, "quantity": "1e-3"})).unwrap();
        assert_eq!(level.price, dec!(0.5));
        assert_eq!(level.quantity, dec!(0.001));
    }

    #[test]
    fn test_level_requires_both_fields() {
        assert!(serde_json::from_value::<MxLevel>(json!({"price": "1"})).is_err());
        assert!(serde_json::from_value::<MxLevel>(json!({"price": "x", "quantity": "1"})).is_err());
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let raw = json!({"price": "1", "quantity": "2", "time": "1700000000000"});
        let trade: MxTrade = serde_json::from_value(raw).unwrap();
        assert_eq!(trade.id, None);
        assert_eq!(trade.side, None);
        assert_eq!(trade.time, Some(1_700_000_000_000));

        let raw = json!({"orderId": 123, "price": null, "status": "New"});
        let order: MxOrder = serde_json::from_value(raw).unwrap();
        assert_eq!(order.order_id.as_deref(), Some("123"));
        assert_eq!(order.price, None);
    }

    #[test]
    fn test_error_body() {
        let body: MxErrorBody =
            serde_json::from_str(r#"{"code":"not_found","message":"gone"}"#).unwrap();
        assert_eq!(body.code.as_deref(), Some("not_found"));
        assert_eq!(body.message.as_deref(), Some("gone"));
    }
}
