//! Response parsers: MX JSON into the canonical model.
//!
//! Every parser takes the raw JSON value, keeps it verbatim in the result's
//! `info` field, and fills only what the payload actually carries.

use mx_core::data::{
    Balance, Balances, Currency, CurrencyLimits, DepositAddress, Fee, Market, MarketLimits,
    MarketPrecision, MinMax, Ohlcv, Order, OrderBook, OrderBookLevel, OrderSide, OrderStatus,
    OrderType, TakerOrMaker, Ticker, Trade, Transaction, TransactionStatus, TransactionType,
};
use mx_core::error::DataError;
use mx_core::types::Timestamp;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

use super::markets::{MarketIndex, currency_code_for};
use super::types::{
    MxAccount, MxAsset, MxDepositAddress, MxDepth, MxExchangeInfo, MxLevel, MxOrder, MxSymbol,
    MxTicker, MxTrade, MxTransaction, de,
};

/// Status string the exchange uses for tradable markets.
const MARKET_RUNNING: &str = "RUNNING";

fn from_raw<T: DeserializeOwned>(raw: &Value, what: &str) -> Result<T, DataError> {
    T::deserialize(raw).map_err(|e| DataError::ParseFailed {
        field: what.to_string(),
        reason: e.to_string(),
    })
}

/// Parses every element of a JSON array with `parse`.
pub fn parse_list<T>(
    raw: &Value,
    what: &str,
    mut parse: impl FnMut(&Value) -> Result<T, DataError>,
) -> Result<Vec<T>, DataError> {
    raw.as_array()
        .ok_or_else(|| DataError::MissingData {
            description: format!("{what} list"),
        })?
        .iter()
        .map(&mut parse)
        .collect()
}

fn levels(side: &[MxLevel]) -> Vec<OrderBookLevel> {
    side.iter()
        .map(|level| OrderBookLevel::new(level.price, level.quantity))
        .collect()
}

fn timestamp(millis: Option<i64>) -> Option<Timestamp> {
    millis.map(Timestamp::from_millis)
}

/// Maps `BUY`/`SELL` (any case).
#[must_use]
pub fn parse_side(side: &str) -> Option<OrderSide> {
    if side.eq_ignore_ascii_case("buy") {
        Some(OrderSide::Buy)
    } else if side.eq_ignore_ascii_case("sell") {
        Some(OrderSide::Sell)
    } else {
        None
    }
}

/// Maps `LIMIT`/`MARKET`; other types are kept lowercased.
#[must_use]
pub fn parse_order_type(order_type: &str) -> OrderType {
    match order_type.to_ascii_uppercase().as_str() {
        "LIMIT" => OrderType::Limit,
        "MARKET" => OrderType::Market,
        _ => OrderType::Other(order_type.to_lowercase()),
    }
}

/// Maps an exchange order status onto the canonical states.
#[must_use]
pub fn parse_order_status(status: &str) -> OrderStatus {
    match status {
        "Pending2Fa" => OrderStatus::Pending,
        "New" | "PartiallyExecuted" => OrderStatus::Open,
        "FullyExecuted" => OrderStatus::Closed,
        "Canceled" | "PartiallyCanceled" | "Rejected" => OrderStatus::Canceled,
        other => OrderStatus::Unknown(other.to_string()),
    }
}

/// Maps an exchange deposit/withdrawal status onto the canonical states.
#[must_use]
pub fn parse_transaction_status(status: &str) -> TransactionStatus {
    match status {
        "Pending" | "Pending2Fa" | "Processing" => TransactionStatus::Pending,
        "Completed" | "Confirmed" => TransactionStatus::Ok,
        "Failed" | "Rejected" => TransactionStatus::Failed,
        "Canceled" => TransactionStatus::Canceled,
        other => TransactionStatus::Unknown(other.to_string()),
    }
}

/// Parses the `symbols` array of an `exchange-info` response.
///
/// Base and quote codes come from `currencies` when the asset is listed there.
pub fn parse_markets(raw: &Value, currencies: &[Currency]) -> Result<Vec<Market>, DataError> {
    let info: MxExchangeInfo = from_raw(raw, "exchange-info")?;
    info.symbols
        .iter()
        .map(|entry| parse_market(entry, currencies))
        .collect()
}

/// Parses one market entry.
///
/// Amount precision comes from the quote asset precision and price precision
/// from the quote commission precision; the base asset precision is not used.
pub fn parse_market(raw: &Value, currencies: &[Currency]) -> Result<Market, DataError> {
    let symbol: MxSymbol = from_raw(raw, "symbol")?;
    let base = currency_code_for(currencies, &symbol.base_asset);
    let quote = currency_code_for(currencies, &symbol.quote_asset);

    Ok(Market {
        symbol: Market::symbol_for(&base, &quote),
        id: symbol.symbol,
        base,
        quote,
        base_id: symbol.base_asset,
        quote_id: symbol.quote_asset,
        precision: MarketPrecision {
            amount: symbol.quote_asset_precision,
            price: symbol.quote_commission_precision,
        },
        limits: MarketLimits::default(),
        active: symbol.status.as_deref() == Some(MARKET_RUNNING),
        info: raw.clone(),
    })
}

/// Parses one `assets` entry.
pub fn parse_currency(raw: &Value) -> Result<Currency, DataError> {
    let asset: MxAsset = from_raw(raw, "asset")?;
    let code = asset
        .code
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| asset.id.to_uppercase());
    let min = asset
        .precision
        .and_then(Currency::min_amount_for)
        .map_or_else(MinMax::default, MinMax::min);

    Ok(Currency {
        id: asset.id,
        code,
        name: asset.name,
        active: asset.is_active.unwrap_or(false),
        fee: asset.withdraw_fee,
        precision: asset.precision,
        limits: CurrencyLimits {
            amount: min,
            price: min,
            cost: MinMax::default(),
            withdraw: MinMax::default(),
        },
        info: raw.clone(),
    })
}

/// Resolves a market: the caller's first, then the index by native id.
fn resolve_symbol(
    market: Option<&Market>,
    native_id: Option<&str>,
    index: &MarketIndex,
) -> Option<String> {
    market
        .or_else(|| native_id.and_then(|id| index.market_by_id(id)))
        .map(|m| m.symbol.clone())
}

/// Parses one ticker.
pub fn parse_ticker(
    raw: &Value,
    market: Option<&Market>,
    index: &MarketIndex,
) -> Result<Ticker, DataError> {
    let ticker: MxTicker = from_raw(raw, "ticker")?;

    Ok(Ticker {
        symbol: resolve_symbol(market, ticker.symbol.as_deref(), index),
        timestamp: timestamp(ticker.time),
        bid: ticker.bid_price,
        ask: ticker.ask_price,
        last: ticker.last_price,
        close: ticker.last_price,
        open: ticker.open_price,
        high: ticker.high_price,
        low: ticker.low_price,
        change: None,
        percentage: None,
        average: None,
        base_volume: ticker.volume,
        info: raw.clone(),
    }
    .with_derived_fields())
}

/// Parses a `depth` response. Levels keep their source order.
pub fn parse_order_book(raw: &Value, symbol: &str) -> Result<OrderBook, DataError> {
    let depth: MxDepth = from_raw(raw, "depth")?;

    Ok(OrderBook {
        symbol: symbol.to_string(),
        bids: levels(&depth.bids),
        asks: levels(&depth.asks),
        timestamp: timestamp(depth.server_time),
        nonce: depth.server_time,
        info: raw.clone(),
    })
}

/// Parses a public or private trade.
pub fn parse_trade(
    raw: &Value,
    market: Option<&Market>,
    index: &MarketIndex,
) -> Result<Trade, DataError> {
    let trade: MxTrade = from_raw(raw, "trade")?;

    let cost = match (trade.price, trade.quantity) {
        (Some(price), Some(amount)) => price.checked_mul(amount),
        _ => None,
    };
    let fee = trade.commission.map(|cost| Fee {
        cost,
        currency: trade
            .commission_asset
            .as_deref()
            .map(|asset| index.currency_code(asset)),
    });
    let taker_or_maker = trade.is_maker.map(|maker| {
        if maker {
            TakerOrMaker::Maker
        } else {
            TakerOrMaker::Taker
        }
    });

    Ok(Trade {
        id: trade.id,
        order_id: trade.order_id,
        timestamp: timestamp(trade.time),
        symbol: resolve_symbol(market, trade.symbol.as_deref(), index),
        order_type: None,
        side: trade.side.as_deref().and_then(parse_side),
        taker_or_maker,
        price: trade.price,
        amount: trade.quantity,
        cost,
        fee,
        info: raw.clone(),
    })
}

/// Parses an order.
///
/// Market orders reported with a zero price get `cost / filled` as their
/// price when both are positive.
pub fn parse_order(
    raw: &Value,
    market: Option<&Market>,
    index: &MarketIndex,
) -> Result<Order, DataError> {
    let order: MxOrder = from_raw(raw, "order")?;
    let id = order
        .order_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| DataError::MissingData {
            description: "order id".to_string(),
        })?;

    let order_type = order.order_type.as_deref().map(parse_order_type);
    let filled = order.executed_quantity;
    let cost = order.cumulative_quote_quantity;
    let mut price = order.price;

    if order_type.as_ref().is_some_and(OrderType::is_market)
        && price.is_some_and(|p| p.is_zero())
    {
        if let (Some(cost), Some(filled)) = (cost, filled) {
            if cost > Decimal::ZERO && filled > Decimal::ZERO {
                price = cost.checked_div(filled).or(price);
            }
        }
    }

    let remaining = match (order.quantity, filled) {
        (Some(amount), Some(filled)) => amount.checked_sub(filled),
        _ => None,
    };
    let status = order
        .status
        .as_deref()
        .map_or_else(|| OrderStatus::Unknown(String::new()), parse_order_status);

    Ok(Order {
        client_order_id: Some(id.clone()),
        id,
        timestamp: timestamp(order.time),
        last_trade_timestamp: None,
        symbol: resolve_symbol(market, order.symbol.as_deref(), index),
        order_type,
        side: order.side.as_deref().and_then(parse_side),
        price,
        amount: order.quantity,
        filled,
        remaining,
        cost,
        average: order.average_price,
        status,
        fee: None,
        info: raw.clone(),
    })
}

/// Parses an `account` response. `total` is always `free + locked`.
pub fn parse_balance(raw: &Value, index: &MarketIndex) -> Result<Balances, DataError> {
    let account: MxAccount = from_raw(raw, "account")?;
    let balances = account
        .balances
        .iter()
        .map(|b| {
            let code = index.currency_code(&b.asset);
            let balance = Balance::new(
                b.free.unwrap_or(Decimal::ZERO),
                b.locked.unwrap_or(Decimal::ZERO),
            )
            .ok_or_else(|| DataError::ParseFailed {
                field: "total".to_string(),
                reason: format!("free + locked overflows for {code}"),
            })?;
            Ok((code, balance))
        })
        .collect::<Result<BTreeMap<String, Balance>, DataError>>()?;

    Ok(Balances {
        timestamp: None,
        balances,
        info: raw.clone(),
    })
}

/// Parses a deposit or withdrawal record.
pub fn parse_transaction(
    raw: &Value,
    transaction_type: TransactionType,
    index: &MarketIndex,
) -> Result<Transaction, DataError> {
    let tx: MxTransaction = from_raw(raw, "transaction")?;
    let currency = tx.asset.as_deref().map(|asset| index.currency_code(asset));

    Ok(Transaction {
        id: tx.id,
        txid: tx.tx_id,
        timestamp: timestamp(tx.time),
        address: tx.address,
        tag: tx.tag,
        transaction_type,
        amount: tx.amount,
        fee: tx.fee.map(|cost| Fee {
            cost,
            currency: currency.clone(),
        }),
        currency,
        status: tx.status.as_deref().map(parse_transaction_status),
        info: raw.clone(),
    })
}

/// Parses an `address/deposit` response for `code`.
pub fn parse_deposit_address(raw: &Value, code: &str) -> Result<DepositAddress, DataError> {
    let address: MxDepositAddress = from_raw(raw, "deposit address")?;

    Ok(DepositAddress {
        currency: code.to_string(),
        address: address
            .address
            .filter(|a| !a.is_empty())
            .ok_or_else(|| DataError::MissingData {
                description: "deposit address".to_string(),
            })?,
        tag: address.tag.filter(|t| !t.is_empty()),
        info: raw.clone(),
    })
}

/// Parses one candle row `[openTime, open, high, low, close, volume]`.
pub fn parse_ohlcv(raw: &Value) -> Result<Ohlcv, DataError> {
    let row = raw.as_array().ok_or_else(|| DataError::MissingData {
        description: "candle row".to_string(),
    })?;
    if row.len() < 6 {
        return Err(DataError::ParseFailed {
            field: "candle".to_string(),
            reason: format!("expected 6 columns, got {}", row.len()),
        });
    }

    let column = |i: usize, name: &str| -> Result<Decimal, DataError> {
        de::decimal_from_value(&row[i])
            .map_err(|reason| DataError::ParseFailed {
                field: name.to_string(),
                reason,
            })?
            .ok_or_else(|| DataError::MissingData {
                description: format!("candle {name}"),
            })
    };

    let open_time = de::millis_from_value(&row[0])
        .map_err(|reason| DataError::ParseFailed {
            field: "openTime".to_string(),
            reason,
        })?
        .ok_or_else(|| DataError::MissingData {
            description: "candle openTime".to_string(),
        })?;

    Ok(Ohlcv {
        timestamp: Timestamp::from_millis(open_time),
        open: column(1, "open")?,
        high: column(2, "high")?,
        low: column(3, "low")?,
        close: column(4, "close")?,
        volume: column(5, "volume")?,
    })
}
