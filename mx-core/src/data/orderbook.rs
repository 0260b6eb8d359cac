//! Order book data structures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Timestamp;

/// A single `[price, amount]` level in the order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookLevel {
    /// Price at this level
    pub price: Decimal,
    /// Amount at this level
    pub amount: Decimal,
}

impl OrderBookLevel {
    /// Creates a new order book level.
    #[must_use]
    pub const fn new(price: Decimal, amount: Decimal) -> Self {
        Self { price, amount }
    }

    /// Returns the level as a `[price, amount]` pair.
    #[must_use]
    pub const fn as_pair(&self) -> [Decimal; 2] {
        [self.price, self.amount]
    }
}

/// Order book snapshot.
///
/// Levels are kept in the order the exchange sent them (bids descending,
/// asks ascending); they are not re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Canonical symbol
    pub symbol: String,
    /// Bid levels
    pub bids: Vec<OrderBookLevel>,
    /// Ask levels
    pub asks: Vec<OrderBookLevel>,
    /// Server time of the snapshot
    pub timestamp: Option<Timestamp>,
    /// Snapshot sequence value (the server time)
    pub nonce: Option<i64>,
    /// Raw exchange payload
    pub info: Value,
}

impl OrderBook {
    /// Returns the best bid (first bid level).
    #[must_use]
    pub fn best_bid(&self) -> Option<&OrderBookLevel> {
        self.bids.first()
    }

    /// Returns the best ask (first ask level).
    #[must_use]
    pub fn best_ask(&self) -> Option<&OrderBookLevel> {
        self.asks.first()
    }

    /// Returns the spread (best ask - best bid).
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    /// Returns the ISO-8601 snapshot time.
    #[must_use]
    pub fn datetime(&self) -> Option<String> {
        self.timestamp.and_then(|ts| ts.to_iso8601())
    }
}
