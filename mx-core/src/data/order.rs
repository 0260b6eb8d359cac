//! Order types and structures for trading operations.
//!
//! This module provides order-related types including:
//! - [`Order`] - An order as last reported by the exchange
//! - [`OrderRequest`] - Request to create a new order
//! - [`OrderSide`] - Buy or Sell direction
//! - [`OrderType`] - Limit, Market, or an exchange-specific type
//! - [`OrderStatus`] - Canonical status with a verbatim fallback

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::Fee;
use crate::types::Timestamp;

/// Order side - Buy or Sell direction.
///
/// # Examples
///
/// ```
/// use mx_core::data::OrderSide;
///
/// assert_eq!(OrderSide::Buy.as_str(), "buy");
/// assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type.
///
/// Exchange types other than limit and market are kept by name rather than
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Limit order - executes at specified price or better
    Limit,
    /// Market order - executes immediately at best available price
    Market,
    /// Any other exchange order type, lowercased
    Other(String),
}

impl OrderType {
    /// Returns true if this order type requires a price.
    #[must_use]
    pub fn requires_price(&self) -> bool {
        matches!(self, Self::Limit)
    }

    /// Returns true if this is a market order.
    #[must_use]
    pub fn is_market(&self) -> bool {
        matches!(self, Self::Market)
    }

    /// Returns the canonical lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Limit => "limit",
            Self::Market => "market",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical order status.
///
/// The exchange's own status strings are mapped onto the four canonical
/// states through a fixed table. Strings outside that table are kept verbatim
/// in [`OrderStatus::Unknown`] so that new exchange states never break a
/// historical fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Resting on the book, possibly partially filled
    Open,
    /// Fully executed
    Closed,
    /// Canceled, possibly after a partial fill
    Canceled,
    /// Accepted but waiting for confirmation (e.g. two-factor)
    Pending,
    /// Unmapped exchange status, preserved as received
    Unknown(String),
}

impl OrderStatus {
    /// Returns true if the order can still trade.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns true if the order reached a final state.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Closed | Self::Canceled)
    }

    /// Returns the canonical name (`unknown` for unmapped statuses).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Canceled => "canceled",
            Self::Pending => "pending",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(raw) => write!(f, "unknown({raw})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// An order as reported by the exchange.
///
/// Orders are never updated in place: every fetch produces a fresh value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Exchange order id
    pub id: String,
    /// Client order id (the exchange exposes none, so this mirrors `id`)
    pub client_order_id: Option<String>,
    /// Creation time
    pub timestamp: Option<Timestamp>,
    /// Time of the last fill, when reported
    pub last_trade_timestamp: Option<Timestamp>,
    /// Canonical symbol, if the market could be resolved
    pub symbol: Option<String>,
    /// Order type
    pub order_type: Option<OrderType>,
    /// Order side
    pub side: Option<OrderSide>,
    /// Limit price, or average execution price for backfilled market orders
    pub price: Option<Decimal>,
    /// Ordered amount
    pub amount: Option<Decimal>,
    /// Executed amount
    pub filled: Option<Decimal>,
    /// Amount still open
    pub remaining: Option<Decimal>,
    /// Executed cost in quote currency
    pub cost: Option<Decimal>,
    /// Average fill price as reported
    pub average: Option<Decimal>,
    /// Canonical status
    pub status: OrderStatus,
    /// Fee charged, when reported
    pub fee: Option<Fee>,
    /// Raw exchange payload
    pub info: Value,
}

impl Order {
    /// Returns the ISO-8601 creation time.
    #[must_use]
    pub fn datetime(&self) -> Option<String> {
        self.timestamp.and_then(|ts| ts.to_iso8601())
    }
}

/// Request to create a new order.
///
/// # Examples
///
/// ```
/// use mx_core::data::{OrderRequest, OrderSide};
/// use rust_decimal::Decimal;
///
/// let request = OrderRequest::limit("MTL/BTC", OrderSide::Buy, Decimal::ONE, Decimal::new(5, 4));
/// assert!(request.order_type.requires_price());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Canonical symbol
    pub symbol: String,
    /// Order type
    pub order_type: OrderType,
    /// Order side
    pub side: OrderSide,
    /// Order amount in base currency
    pub amount: Decimal,
    /// Limit price
    pub price: Option<Decimal>,
    /// Extra exchange parameters merged into the request body
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl OrderRequest {
    /// Creates a limit order request.
    #[must_use]
    pub fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        amount: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            order_type: OrderType::Limit,
            side,
            amount,
            price: Some(price),
            params: Map::new(),
        }
    }

    /// Creates a market order request.
    #[must_use]
    pub fn market(symbol: impl Into<String>, side: OrderSide, amount: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            order_type: OrderType::Market,
            side,
            amount,
            price: None,
            params: Map::new(),
        }
    }

    /// Adds an extra exchange parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_side() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.to_string(), "sell");
    }

    #[test]
    fn test_order_type() {
        assert!(OrderType::Limit.requires_price());
        assert!(!OrderType::Market.requires_price());
        assert!(OrderType::Market.is_market());
        assert_eq!(OrderType::Other("stop".to_string()).as_str(), "stop");
    }

    #[test]
    fn test_order_status_names() {
        assert_eq!(OrderStatus::Closed.as_str(), "closed");
        assert_eq!(OrderStatus::Unknown("FooBar".to_string()).as_str(), "unknown");
        assert_eq!(
            OrderStatus::Unknown("FooBar".to_string()).to_string(),
            "unknown(FooBar)"
        );
        assert!(OrderStatus::Canceled.is_final());
        assert!(!OrderStatus::Pending.is_final());
        assert!(OrderStatus::Open.is_open());
    }

    #[test]
    fn test_order_request_builders() {
        let limit = OrderRequest::limit("MTL/BTC", OrderSide::Buy, dec!(2), dec!(0.0005));
        assert_eq!(limit.price, Some(dec!(0.0005)));
        assert_eq!(limit.order_type, OrderType::Limit);

        let market = OrderRequest::market("MTL/BTC", OrderSide::Sell, dec!(1))
            .with_param("timeInForce", "IOC");
        assert!(market.price.is_none());
        assert_eq!(market.params["timeInForce"], "IOC");
    }

    #[test]
    fn test_order_datetime() {
        let order = Order {
            id: "1".to_string(),
            client_order_id: Some("1".to_string()),
            timestamp: Some(Timestamp::from_millis(1_546_300_800_000)),
            last_trade_timestamp: None,
            symbol: None,
            order_type: None,
            side: None,
            price: None,
            amount: None,
            filled: None,
            remaining: None,
            cost: None,
            average: None,
            status: OrderStatus::Open,
            fee: None,
            info: Value::Null,
        };
        assert_eq!(order.datetime().unwrap(), "2019-01-01T00:00:00.000Z");
    }
}
