//! Endpoint table and request preparation.
//!
//! [`prepare`] is a pure function: it turns an [`Endpoint`] and a parameter
//! map into a [`PreparedRequest`] without touching the network. Path
//! placeholders (`orders/{orderId}`) are filled from the parameters and the
//! consumed entries removed; what remains becomes the query string for `GET`
//! and the JSON body otherwise.

use mx_core::error::ArgumentError;
use mx_core::traits::HttpMethod;
use serde_json::{Map, Value};
use std::fmt;

/// Whether an endpoint needs signed requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// No authentication headers
    Public,
    /// Signed with the account credentials
    Private,
}

/// Every REST endpoint the adapter calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Market list
    ExchangeInfo,
    /// Currency list
    Assets,
    /// 24h tickers
    Tickers,
    /// Order book
    Depth,
    /// Public trades
    Trades,
    /// Candles
    Ohlcv,
    /// Account balances
    Account,
    /// Deposit history
    Deposits,
    /// Withdrawal history
    Withdrawals,
    /// Order history
    Orders,
    /// Single order
    Order,
    /// Own trades
    MyTrades,
    /// Deposit address
    DepositAddress,
    /// Place an order
    CreateOrder,
    /// Request a withdrawal
    Withdraw,
    /// Cancel an order
    CancelOrder,
}

impl Endpoint {
    /// Every endpoint, in table order.
    pub const ALL: [Self; 16] = [
        Self::ExchangeInfo,
        Self::Assets,
        Self::Tickers,
        Self::Depth,
        Self::Trades,
        Self::Ohlcv,
        Self::Account,
        Self::Deposits,
        Self::Withdrawals,
        Self::Orders,
        Self::Order,
        Self::MyTrades,
        Self::DepositAddress,
        Self::CreateOrder,
        Self::Withdraw,
        Self::CancelOrder,
    ];

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        match self {
            Self::CreateOrder | Self::Withdraw => HttpMethod::Post,
            Self::CancelOrder => HttpMethod::Put,
            _ => HttpMethod::Get,
        }
    }

    /// Returns the path template, relative to the versioned API root.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::ExchangeInfo => "exchange-info",
            Self::Assets => "assets",
            Self::Tickers => "tickers",
            Self::Depth => "depth",
            Self::Trades => "trades",
            Self::Ohlcv => "ohlcv",
            Self::Account => "account",
            Self::Deposits => "deposits",
            Self::Withdrawals => "withdrawals",
            Self::Orders | Self::CreateOrder => "orders",
            Self::Order => "orders/{orderId}",
            Self::MyTrades => "trades/me",
            Self::DepositAddress => "address/deposit",
            Self::Withdraw => "withdraw",
            Self::CancelOrder => "orders/cancel",
        }
    }

    /// Returns the access class.
    #[must_use]
    pub const fn access(&self) -> Access {
        match self {
            Self::ExchangeInfo
            | Self::Assets
            | Self::Tickers
            | Self::Depth
            | Self::Trades
            | Self::Ohlcv => Access::Public,
            _ => Access::Private,
        }
    }

    /// Returns true if requests must be signed.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        matches!(self.access(), Access::Private)
    }

    /// Returns a stable name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ExchangeInfo => "exchange_info",
            Self::Assets => "assets",
            Self::Tickers => "tickers",
            Self::Depth => "depth",
            Self::Trades => "trades",
            Self::Ohlcv => "ohlcv",
            Self::Account => "account",
            Self::Deposits => "deposits",
            Self::Withdrawals => "withdrawals",
            Self::Orders => "orders",
            Self::Order => "order",
            Self::MyTrades => "my_trades",
            Self::DepositAddress => "deposit_address",
            Self::CreateOrder => "create_order",
            Self::Withdraw => "withdraw",
            Self::CancelOrder => "cancel_order",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request with its path resolved and parameters encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// Endpoint the request was prepared for
    pub endpoint: Endpoint,
    /// HTTP method
    pub method: HttpMethod,
    /// Path with placeholders substituted
    pub path: String,
    /// URL-encoded query string (GET only, `None` when empty)
    pub query: Option<String>,
    /// JSON body (non-GET only, `{}` when empty)
    pub body: Option<String>,
}

impl PreparedRequest {
    /// Returns `{api_root}/{path}[?{query}]`.
    #[must_use]
    pub fn url(&self, api_root: &str) -> String {
        let root = api_root.trim_end_matches('/');
        match &self.query {
            Some(query) => format!("{root}/{}?{query}", self.path),
            None => format!("{root}/{}", self.path),
        }
    }
}

/// Prepares a request for `endpoint` from `params`.
///
/// # Errors
///
/// Returns [`ArgumentError::MissingArgument`] when a path placeholder has no
/// (non-empty) value, and [`ArgumentError::InvalidArgument`] when a
/// remaining GET parameter cannot be URL-encoded.
///
/// # Examples
///
/// ```
/// use mx_gateway::rest::{Endpoint, prepare};
/// use serde_json::{Map, json};
///
/// let mut params = Map::new();
/// params.insert("orderId".to_string(), json!("123"));
/// params.insert("symbol".to_string(), json!("MTLBTC"));
///
/// let request = prepare(Endpoint::Order, params).unwrap();
/// assert_eq!(request.path, "orders/123");
/// assert_eq!(request.query.as_deref(), Some("symbol=MTLBTC"));
/// ```
pub fn prepare(
    endpoint: Endpoint,
    mut params: Map<String, Value>,
) -> Result<PreparedRequest, ArgumentError> {
    let path = substitute_placeholders(endpoint, &mut params)?;
    let method = endpoint.method();

    let (query, body) = match method {
        HttpMethod::Get => (encode_query(&params)?, None),
        HttpMethod::Post | HttpMethod::Put => {
            let body = serde_json::to_string(&params)
                .map_err(|e| ArgumentError::invalid("params", e.to_string()))?;
            (None, Some(body))
        }
    };

    Ok(PreparedRequest {
        endpoint,
        method,
        path,
        query,
        body,
    })
}

fn substitute_placeholders(
    endpoint: Endpoint,
    params: &mut Map<String, Value>,
) -> Result<String, ArgumentError> {
    let template = endpoint.path();
    let mut segments = Vec::new();

    for segment in template.split('/') {
        let Some(name) = segment
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        else {
            segments.push(segment.to_string());
            continue;
        };

        let value = params
            .remove(name)
            .and_then(|value| render(&value))
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ArgumentError::missing(name, template))?;
        segments.push(value);
    }

    Ok(segments.join("/"))
}

fn encode_query(params: &Map<String, Value>) -> Result<Option<String>, ArgumentError> {
    let pairs: Vec<(&str, String)> = params
        .iter()
        .filter_map(|(key, value)| render(value).map(|value| (key.as_str(), value)))
        .collect();

    if pairs.is_empty() {
        return Ok(None);
    }

    serde_urlencoded::to_string(&pairs)
        .map(Some)
        .map_err(|e| ArgumentError::invalid("params", e.to_string()))
}

/// Renders a parameter without JSON quoting; `null` means absent.
fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
