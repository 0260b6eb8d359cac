//! Trade execution records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{OrderSide, OrderType};
use crate::types::Timestamp;

/// Fee charged on an execution or order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    /// Fee amount
    pub cost: Decimal,
    /// Currency the fee was charged in
    pub currency: Option<String>,
}

/// Liquidity role of an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TakerOrMaker {
    /// Consumed resting liquidity
    Taker,
    /// Provided resting liquidity
    Maker,
}

/// An execution record.
///
/// Public and private trade feeds share this type: fields absent from the
/// shape that produced the record stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Trade id (private trades only)
    pub id: Option<String>,
    /// Order id (private trades only)
    pub order_id: Option<String>,
    /// Execution time
    pub timestamp: Option<Timestamp>,
    /// Canonical symbol, if the market could be resolved
    pub symbol: Option<String>,
    /// Type of the order that produced the trade
    pub order_type: Option<OrderType>,
    /// Side of the order that produced the trade
    pub side: Option<OrderSide>,
    /// Liquidity role
    pub taker_or_maker: Option<TakerOrMaker>,
    /// Execution price
    pub price: Option<Decimal>,
    /// Executed amount
    pub amount: Option<Decimal>,
    /// `price × amount`
    pub cost: Option<Decimal>,
    /// Fee charged
    pub fee: Option<Fee>,
    /// Raw exchange payload
    pub info: Value,
}

impl Trade {
    /// Returns the ISO-8601 execution time.
    #[must_use]
    pub fn datetime(&self) -> Option<String> {
        self.timestamp.and_then(|ts| ts.to_iso8601())
    }
}
