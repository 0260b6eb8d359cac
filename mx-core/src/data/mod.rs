//! Canonical data model.
//!
//! Every exchange response is normalized into one of these structures. Each
//! entity keeps the raw exchange payload in its `info` field; it is never
//! parsed twice and never mutated.
//!
//! # Structures
//!
//! - Market / Currency - Exchange metadata, loaded once per session
//! - Ticker - Point-in-time market snapshot
//! - OrderBook - Bid/ask levels in exchange order
//! - Ohlcv / Timeframe - Candles and their supported intervals
//! - Trade - Public or private execution record
//! - Order / OrderRequest - Orders as reported, and as submitted
//! - Balances - Per-currency free/locked/total amounts
//! - Transaction / DepositAddress - Deposits, withdrawals and funding addresses
//!
//! Fields the exchange does not provide are `None`, never a sentinel zero.

mod balance;
mod kline;
mod market;
mod order;
mod orderbook;
mod ticker;
mod trade;
mod transaction;

pub use balance::{Balance, Balances};
pub use kline::{Ohlcv, Timeframe};
pub use market::{Currency, CurrencyLimits, Market, MarketLimits, MarketPrecision, MinMax};
pub use order::{Order, OrderRequest, OrderSide, OrderStatus, OrderType};
pub use orderbook::{OrderBook, OrderBookLevel};
pub use ticker::Ticker;
pub use trade::{Fee, TakerOrMaker, Trade};
pub use transaction::{DepositAddress, Transaction, TransactionStatus, TransactionType};
