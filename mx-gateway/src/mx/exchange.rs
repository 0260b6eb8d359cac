//! MX exchange facade.
//!
//! Implements [`ExchangeApi`] on top of a [`Transport`]. Every operation
//! validates its arguments, checks credentials when the endpoint is private,
//! and only then sends a request. Failed responses are classified by
//! [`classify`]; successful ones go through the matching parser.

use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use mx_core::config::Validatable;
use mx_core::data::{
    Balances, Currency, DepositAddress, Market, Ohlcv, Order, OrderBook, OrderRequest, OrderSide,
    OrderType, Ticker, Timeframe, Trade, Transaction, TransactionType,
};
use mx_core::error::{ArgumentError, ConfigError, DataError, MxError, Result};
use mx_core::traits::{ExchangeApi, HttpRequest, Transport};
use mx_core::types::Timestamp;

use crate::rest::{Endpoint, HttpTransport, NonceGenerator, RequestSigner, RestConfig, prepare};

use super::errors::classify;
use super::markets::MarketIndex;
use super::parser;

/// Nonces are shared by every exchange instance in the process.
static NONCES: NonceGenerator = NonceGenerator::new();

/// MX exchange adapter.
///
/// # Example
///
/// ```no_run
/// use mx_core::traits::ExchangeApi;
/// use mx_gateway::mx::MxExchange;
/// use mx_gateway::rest::RestConfig;
///
/// # async fn run() -> mx_core::error::Result<()> {
/// let config = RestConfig::builder()
///     .base_url("https://api.example.com")
///     .api_key("key")
///     .api_user("user")
///     .api_secret("secret")
///     .build();
///
/// let exchange = MxExchange::from_config(config)?;
/// exchange.load_markets(false).await?;
/// let book = exchange.fetch_order_book("MTL/BTC", Some(20)).await?;
/// # Ok(())
/// # }
/// ```
pub struct MxExchange<T: Transport> {
    config: RestConfig,
    transport: T,
    markets: RwLock<Arc<MarketIndex>>,
    /// Serializes market loads so concurrent first calls fetch once.
    market_loading: Mutex<()>,
}

impl MxExchange<HttpTransport> {
    /// Creates an exchange using the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns `MxError::Config` if `config` is invalid and
    /// `MxError::Network` if the HTTP client cannot be built.
    pub fn from_config(config: RestConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> MxExchange<T> {
    /// Creates an exchange sending requests through `transport`.
    #[must_use]
    pub fn new(config: RestConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            markets: RwLock::new(Arc::new(MarketIndex::default())),
            market_loading: Mutex::new(()),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the current market index.
    #[must_use]
    pub fn market_index(&self) -> Arc<MarketIndex> {
        Arc::clone(&self.markets.read())
    }

    /// Builds a signer from the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` naming the first absent credential.
    pub fn check_required_credentials(&self) -> std::result::Result<RequestSigner, ConfigError> {
        RequestSigner::from_credentials(&self.config.credentials())
    }

    async fn request(&self, endpoint: Endpoint, params: Map<String, Value>) -> Result<Value> {
        let prepared = prepare(endpoint, params)?;

        let headers = if endpoint.is_private() {
            self.check_required_credentials()?
                .auth_headers(NONCES.next())?
        } else {
            Vec::new()
        };

        debug!(
            exchange = "mx",
            endpoint = %endpoint,
            method = %prepared.method,
            path = %prepared.path,
            "Dispatching request"
        );

        let request = HttpRequest {
            method: prepared.method,
            url: prepared.url(&self.config.api_root()),
            headers,
            body: prepared.body,
        };
        let response = self.transport.execute(request).await?;

        if !response.is_success() {
            return Err(classify(response.status, &response.body).into());
        }

        serde_json::from_str(&response.body).map_err(|e| MxError::Data(DataError::from(e)))
    }

    async fn fetch_markets_with(&self, currencies: &[Currency]) -> Result<Vec<Market>> {
        let raw = self.request(Endpoint::ExchangeInfo, Map::new()).await?;
        Ok(parser::parse_markets(&raw, currencies)?)
    }

    /// Returns the loaded index, loading markets first if needed.
    async fn ensure_markets(&self) -> Result<Arc<MarketIndex>> {
        let index = self.market_index();
        if index.is_loaded() {
            return Ok(index);
        }
        self.load_markets(false).await?;
        Ok(self.market_index())
    }

    async fn resolve_market(&self, symbol: &str, operation: &str) -> Result<Market> {
        require_non_empty(symbol, "symbol", operation)?;
        let index = self.ensure_markets().await?;
        index
            .market(symbol)
            .cloned()
            .ok_or_else(|| {
                ArgumentError::UnknownSymbol {
                    symbol: symbol.to_string(),
                }
                .into()
            })
    }

    async fn resolve_optional_market(
        &self,
        symbol: Option<&str>,
        operation: &str,
    ) -> Result<Option<Market>> {
        match symbol {
            Some(symbol) => self.resolve_market(symbol, operation).await.map(Some),
            None => Ok(None),
        }
    }

    async fn resolve_currency(&self, code: &str, operation: &str) -> Result<Currency> {
        require_non_empty(code, "code", operation)?;
        let index = self.ensure_markets().await?;
        index.currency(code).cloned().ok_or_else(|| {
            ArgumentError::UnknownCurrency {
                code: code.to_string(),
            }
            .into()
        })
    }

    async fn fetch_transactions(
        &self,
        endpoint: Endpoint,
        transaction_type: TransactionType,
        code: Option<&str>,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>> {
        let operation = endpoint.name();
        if let Some(code) = code {
            require_non_empty(code, "code", operation)?;
        }
        self.check_required_credentials()?;
        let index = self.ensure_markets().await?;

        let mut params = Map::new();
        if let Some(code) = code {
            let currency = self.resolve_currency(code, operation).await?;
            params.insert("asset".to_string(), Value::String(currency.id));
        }
        insert_window(&mut params, since, limit);

        let raw = self.request(endpoint, params).await?;
        let transactions = parser::parse_list(&raw, operation, |v| {
            parser::parse_transaction(v, transaction_type, &index)
        })?;

        debug!(
            exchange = "mx",
            endpoint = %endpoint,
            count = transactions.len(),
            "Parsed transactions"
        );
        Ok(transactions)
    }
}

fn require_non_empty(
    value: &str,
    name: &str,
    operation: &str,
) -> std::result::Result<(), ArgumentError> {
    if value.trim().is_empty() {
        return Err(ArgumentError::missing(name, operation));
    }
    Ok(())
}

fn require_positive(
    value: Decimal,
    name: &str,
) -> std::result::Result<(), ArgumentError> {
    if value <= Decimal::ZERO {
        return Err(ArgumentError::invalid(name, format!("must be positive, got {value}")));
    }
    Ok(())
}

/// `since` becomes `startTime`; `limit` is passed through.
fn insert_window(params: &mut Map<String, Value>, since: Option<Timestamp>, limit: Option<u32>) {
    if let Some(since) = since {
        params.insert("startTime".to_string(), Value::from(since.as_millis()));
    }
    if let Some(limit) = limit {
        params.insert("limit".to_string(), Value::from(limit));
    }
}

const fn wire_side(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Buy => "BUY",
        OrderSide::Sell => "SELL",
    }
}

fn wire_order_type(order_type: &OrderType) -> String {
    order_type.as_str().to_uppercase()
}

#[async_trait]
impl<T: Transport> ExchangeApi for MxExchange<T> {
    fn id(&self) -> &'static str {
        "mx"
    }

    async fn load_markets(&self, reload: bool) -> Result<Vec<Market>> {
        if !reload {
            let index = self.market_index();
            if index.is_loaded() {
                return Ok(index.markets().to_vec());
            }
        }

        let _loading = self.market_loading.lock().await;
        if !reload {
            let index = self.market_index();
            if index.is_loaded() {
                return Ok(index.markets().to_vec());
            }
        }

        let currencies = self.fetch_currencies().await?;
        let markets = self.fetch_markets_with(&currencies).await?;
        let index = Arc::new(MarketIndex::new(markets, currencies));

        info!(
            exchange = "mx",
            markets = index.markets().len(),
            currencies = index.currencies().len(),
            reload,
            "Markets loaded"
        );

        *self.markets.write() = Arc::clone(&index);
        Ok(index.markets().to_vec())
    }

    async fn fetch_markets(&self) -> Result<Vec<Market>> {
        let index = self.market_index();
        self.fetch_markets_with(index.currencies()).await
    }

    async fn fetch_currencies(&self) -> Result<Vec<Currency>> {
        let raw = self.request(Endpoint::Assets, Map::new()).await?;
        Ok(parser::parse_list(&raw, "assets", parser::parse_currency)?)
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker> {
        let market = self.resolve_market(symbol, "fetch_ticker").await?;

        let mut params = Map::new();
        params.insert("symbol".to_string(), Value::String(market.id.clone()));
        let raw = self.request(Endpoint::Tickers, params).await?;

        let entry = match &raw {
            Value::Array(entries) => entries.first().ok_or_else(|| DataError::MissingData {
                description: format!("ticker for {symbol}"),
            })?,
            other => other,
        };
        Ok(parser::parse_ticker(entry, Some(&market), &self.market_index())?)
    }

    async fn fetch_tickers(&self, symbols: Option<&[&str]>) -> Result<Vec<Ticker>> {
        if let Some(symbols) = symbols {
            for symbol in symbols {
                self.resolve_market(symbol, "fetch_tickers").await?;
            }
        }

        let index = self.ensure_markets().await?;
        let raw = self.request(Endpoint::Tickers, Map::new()).await?;
        let tickers =
            parser::parse_list(&raw, "tickers", |v| parser::parse_ticker(v, None, &index))?;

        let tickers: Vec<Ticker> = match symbols {
            Some(symbols) => tickers
                .into_iter()
                .filter(|t| t.symbol.as_deref().is_some_and(|s| symbols.contains(&s)))
                .collect(),
            None => tickers,
        };

        debug!(exchange = "mx", count = tickers.len(), "Parsed tickers");
        Ok(tickers)
    }

    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> Result<OrderBook> {
        let market = self.resolve_market(symbol, "fetch_order_book").await?;

        let mut params = Map::new();
        params.insert("symbol".to_string(), Value::String(market.id.clone()));
        insert_window(&mut params, None, limit);

        let raw = self.request(Endpoint::Depth, params).await?;
        Ok(parser::parse_order_book(&raw, &market.symbol)?)
    }

    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>> {
        let market = self.resolve_market(symbol, "fetch_trades").await?;

        let mut params = Map::new();
        params.insert("symbol".to_string(), Value::String(market.id.clone()));
        insert_window(&mut params, since, limit);

        let raw = self.request(Endpoint::Trades, params).await?;
        let index = self.market_index();
        Ok(parser::parse_list(&raw, "trades", |v| {
            parser::parse_trade(v, Some(&market), &index)
        })?)
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: &str,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Ohlcv>> {
        let timeframe: Timeframe = timeframe.parse()?;
        let market = self.resolve_market(symbol, "fetch_ohlcv").await?;

        let mut params = Map::new();
        params.insert("symbol".to_string(), Value::String(market.id.clone()));
        params.insert("interval".to_string(), Value::String(timeframe.to_string()));
        insert_window(&mut params, since, limit);

        let raw = self.request(Endpoint::Ohlcv, params).await?;
        Ok(parser::parse_list(&raw, "ohlcv", parser::parse_ohlcv)?)
    }

    async fn fetch_balance(&self) -> Result<Balances> {
        self.check_required_credentials()?;
        let index = self.ensure_markets().await?;
        let raw = self.request(Endpoint::Account, Map::new()).await?;
        Ok(parser::parse_balance(&raw, &index)?)
    }

    async fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>> {
        self.fetch_transactions(Endpoint::Deposits, TransactionType::Deposit, code, since, limit)
            .await
    }

    async fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>> {
        self.fetch_transactions(
            Endpoint::Withdrawals,
            TransactionType::Withdrawal,
            code,
            since,
            limit,
        )
        .await
    }

    async fn fetch_orders(
        &self,
        symbol: Option<&str>,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>> {
        if let Some(symbol) = symbol {
            require_non_empty(symbol, "symbol", "fetch_orders")?;
        }
        self.check_required_credentials()?;
        let index = self.ensure_markets().await?;
        let market = self.resolve_optional_market(symbol, "fetch_orders").await?;

        let mut params = Map::new();
        if let Some(market) = &market {
            params.insert("symbol".to_string(), Value::String(market.id.clone()));
        }
        insert_window(&mut params, since, limit);

        let raw = self.request(Endpoint::Orders, params).await?;
        let orders = parser::parse_list(&raw, "orders", |v| {
            parser::parse_order(v, market.as_ref(), &index)
        })?;

        debug!(exchange = "mx", count = orders.len(), "Parsed orders");
        Ok(orders)
    }

    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>> {
        let orders = self.fetch_orders(symbol, since, limit).await?;
        Ok(orders.into_iter().filter(|o| o.status.is_open()).collect())
    }

    async fn fetch_closed_orders(
        &self,
        symbol: Option<&str>,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>> {
        let orders = self.fetch_orders(symbol, since, limit).await?;
        Ok(orders.into_iter().filter(|o| o.status.is_final()).collect())
    }

    async fn fetch_order(&self, id: &str, symbol: Option<&str>) -> Result<Order> {
        require_non_empty(id, "id", "fetch_order")?;
        if let Some(symbol) = symbol {
            require_non_empty(symbol, "symbol", "fetch_order")?;
        }
        self.check_required_credentials()?;
        let index = self.ensure_markets().await?;
        let market = self.resolve_optional_market(symbol, "fetch_order").await?;

        let mut params = Map::new();
        params.insert("orderId".to_string(), Value::String(id.to_string()));
        if let Some(market) = &market {
            params.insert("symbol".to_string(), Value::String(market.id.clone()));
        }

        let raw = self.request(Endpoint::Order, params).await?;
        Ok(parser::parse_order(&raw, market.as_ref(), &index)?)
    }

    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>> {
        if let Some(symbol) = symbol {
            require_non_empty(symbol, "symbol", "fetch_my_trades")?;
        }
        self.check_required_credentials()?;
        let index = self.ensure_markets().await?;
        let market = self.resolve_optional_market(symbol, "fetch_my_trades").await?;

        let mut params = Map::new();
        if let Some(market) = &market {
            params.insert("symbol".to_string(), Value::String(market.id.clone()));
        }
        insert_window(&mut params, since, limit);

        let raw = self.request(Endpoint::MyTrades, params).await?;
        Ok(parser::parse_list(&raw, "my trades", |v| {
            parser::parse_trade(v, market.as_ref(), &index)
        })?)
    }

    async fn fetch_deposit_address(&self, code: &str) -> Result<DepositAddress> {
        require_non_empty(code, "code", "fetch_deposit_address")?;
        self.check_required_credentials()?;
        let currency = self.resolve_currency(code, "fetch_deposit_address").await?;

        let mut params = Map::new();
        params.insert("asset".to_string(), Value::String(currency.id.clone()));

        let raw = self.request(Endpoint::DepositAddress, params).await?;
        Ok(parser::parse_deposit_address(&raw, &currency.code)?)
    }

    async fn create_order(&self, request: OrderRequest) -> Result<Order> {
        require_non_empty(&request.symbol, "symbol", "create_order")?;
        require_positive(request.amount, "amount")?;
        if request.order_type.requires_price() {
            let price = request
                .price
                .ok_or_else(|| ArgumentError::missing("price", "create_order"))?;
            require_positive(price, "price")?;
        }
        self.check_required_credentials()?;
        let market = self.resolve_market(&request.symbol, "create_order").await?;

        let mut params = Map::new();
        params.insert("symbol".to_string(), Value::String(market.id.clone()));
        params.insert("side".to_string(), Value::from(wire_side(request.side)));
        params.insert("type".to_string(), Value::String(wire_order_type(&request.order_type)));
        params.insert("quantity".to_string(), Value::String(request.amount.to_string()));
        if let Some(price) = request.price {
            params.insert("price".to_string(), Value::String(price.to_string()));
        }
        params.extend(request.params);

        let raw = self.request(Endpoint::CreateOrder, params).await?;
        let order = parser::parse_order(&raw, Some(&market), &self.market_index())?;

        info!(
            exchange = "mx",
            order_id = %order.id,
            symbol = %market.symbol,
            side = %request.side,
            "Order submitted"
        );
        Ok(order)
    }

    async fn cancel_order(&self, id: &str, symbol: &str) -> Result<Order> {
        require_non_empty(id, "id", "cancel_order")?;
        require_non_empty(symbol, "symbol", "cancel_order")?;
        self.check_required_credentials()?;
        let market = self.resolve_market(symbol, "cancel_order").await?;

        let mut params = Map::new();
        params.insert("orderId".to_string(), Value::String(id.to_string()));
        params.insert("symbol".to_string(), Value::String(market.id.clone()));

        let raw = self.request(Endpoint::CancelOrder, params).await?;
        let order = parser::parse_order(&raw, Some(&market), &self.market_index())?;

        info!(exchange = "mx", order_id = %order.id, status = %order.status, "Order canceled");
        Ok(order)
    }

    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
    ) -> Result<Transaction> {
        require_non_empty(code, "code", "withdraw")?;
        require_non_empty(address, "address", "withdraw")?;
        require_positive(amount, "amount")?;
        self.check_required_credentials()?;
        let currency = self.resolve_currency(code, "withdraw").await?;

        let mut params = Map::new();
        params.insert("asset".to_string(), Value::String(currency.id.clone()));
        params.insert("amount".to_string(), Value::String(amount.to_string()));
        params.insert("address".to_string(), Value::String(address.to_string()));
        if let Some(tag) = tag.filter(|t| !t.is_empty()) {
            params.insert("tag".to_string(), Value::String(tag.to_string()));
        }

        let raw = self.request(Endpoint::Withdraw, params).await?;
        let mut transaction =
            parser::parse_transaction(&raw, TransactionType::Withdrawal, &self.market_index())?;
        transaction.currency.get_or_insert(currency.code);
        transaction.amount.get_or_insert(amount);
        transaction
            .address
            .get_or_insert_with(|| address.to_string());

        info!(exchange = "mx", id = ?transaction.id, "Withdrawal requested");
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_core::data::{OrderStatus, TransactionStatus};
    use mx_core::error::{ExchangeError, NetworkError};
    use mx_core::traits::{HttpMethod, HttpResponse};
    use parking_lot::Mutex;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::collections::HashMap;

    const ROOT: &str = "https://api.test/v1/";

    /// Replays canned responses by path and records every request.
    #[derive(Default)]
    struct MockTransport {
        routes: Mutex<HashMap<String, HttpResponse>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        fn route(self, path: &str, status: u16, body: Value) -> Self {
            self.routes
                .lock()
                .insert(path.to_string(), HttpResponse::new(status, body.to_string()));
            self
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().clone()
        }

        fn paths(&self) -> Vec<String> {
            self.requests().iter().map(|r| path_of(&r.url)).collect()
        }
    }

    fn path_of(url: &str) -> String {
        let rest = url.strip_prefix(ROOT).unwrap_or(url);
        rest.split('?').next().unwrap_or(rest).to_string()
    }

    fn query_of(url: &str) -> Option<String> {
        url.split_once('?').map(|(_, q)| q.to_string())
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn execute(
            &self,
            request: HttpRequest,
        ) -> std::result::Result<HttpResponse, NetworkError> {
            let path = path_of(&request.url);
            self.requests.lock().push(request);
            // Suspend once so concurrent callers interleave.
            tokio::task::yield_now().await;
            Ok(self
                .routes
                .lock()
                .get(&path)
                .cloned()
                .unwrap_or_else(|| HttpResponse::new(404, "")))
        }
    }

    fn market_routes(transport: MockTransport) -> MockTransport {
        transport
            .route(
                "exchange-info",
                200,
                json!({
                    "serverTime": 1_700_000_000_000_i64,
                    "symbols": [{
                        "symbol": "MTLBTC", "status": "RUNNING",
                        "baseAsset": "MTL", "baseAssetPrecision": 2,
                        "quoteAsset": "BTC", "quoteAssetPrecision": 8,
                        "quoteCommissionPrecision": 6
                    }]
                }),
            )
            .route(
                "assets",
                200,
                json!([
                    {"id": "btc", "code": "BTC", "isActive": true, "precision": 8},
                    {"id": "mtl", "code": "MTL", "isActive": true, "precision": 2}
                ]),
            )
    }

    fn config(with_credentials: bool) -> RestConfig {
        let builder = RestConfig::builder().base_url("https://api.test");
        if with_credentials {
            builder.api_key("key").api_user("user").api_secret("secret").build()
        } else {
            builder.build()
        }
    }

    fn exchange(transport: MockTransport, with_credentials: bool) -> MxExchange<MockTransport> {
        MxExchange::new(config(with_credentials), market_routes(transport))
    }

    #[tokio::test]
    async fn test_private_call_without_credentials_never_reaches_transport() {
        let exchange = exchange(MockTransport::default(), false);

        let err = exchange.fetch_balance().await.unwrap_err();
        assert!(err.is_config_error());

        let err = exchange
            .create_order(OrderRequest::market("MTL/BTC", OrderSide::Buy, dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MxError::Config(ConfigError::MissingField { ref field, .. }) if field == "api_key"
        ));
        assert!(exchange.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_timeframe_never_reaches_transport() {
        let exchange = exchange(MockTransport::default(), true);

        let err = exchange.fetch_ohlcv("MTL/BTC", "4h", None, None).await.unwrap_err();
        assert!(matches!(
            err,
            MxError::Argument(ArgumentError::UnsupportedTimeframe { .. })
        ));
        assert!(exchange.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_argument_errors_before_io() {
        let exchange = exchange(MockTransport::default(), true);

        let limit_without_price = OrderRequest {
            price: None,
            ..OrderRequest::limit("MTL/BTC", OrderSide::Buy, dec!(1), dec!(1))
        };
        assert!(exchange.create_order(limit_without_price).await.unwrap_err().is_argument_error());
        assert!(
            exchange
                .create_order(OrderRequest::market("MTL/BTC", OrderSide::Sell, dec!(0)))
                .await
                .unwrap_err()
                .is_argument_error()
        );
        assert!(exchange.cancel_order("", "MTL/BTC").await.unwrap_err().is_argument_error());
        assert!(exchange.fetch_order_book("", None).await.unwrap_err().is_argument_error());
        assert!(
            exchange
                .withdraw("BTC", dec!(1), " ", None)
                .await
                .unwrap_err()
                .is_argument_error()
        );
        assert!(exchange.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_symbol_after_load() {
        let exchange = exchange(MockTransport::default(), true);

        let err = exchange.fetch_order_book("DOGE/BTC", None).await.unwrap_err();
        assert_eq!(
            err.as_argument_error(),
            Some(&ArgumentError::UnknownSymbol {
                symbol: "DOGE/BTC".to_string()
            })
        );
        assert_eq!(exchange.transport().paths(), vec!["assets", "exchange-info"]);

        let err = exchange.fetch_deposit_address("DOGE").await.unwrap_err();
        assert!(matches!(
            err,
            MxError::Argument(ArgumentError::UnknownCurrency { .. })
        ));
        assert_eq!(exchange.transport().requests().len(), 2);
    }

    #[tokio::test]
    async fn test_markets_loaded_once_until_reload() {
        let exchange = exchange(MockTransport::default(), false);

        let markets = exchange.load_markets(false).await.unwrap();
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].symbol, "MTL/BTC");
        exchange.load_markets(false).await.unwrap();
        assert_eq!(exchange.transport().requests().len(), 2);

        let before = exchange.market_index();
        exchange.load_markets(true).await.unwrap();
        assert_eq!(exchange.transport().requests().len(), 4);
        assert!(!Arc::ptr_eq(&before, &exchange.market_index()));
    }

    #[tokio::test]
    async fn test_public_requests_are_unsigned() {
        let transport = MockTransport::default().route(
            "depth",
            200,
            json!({"serverTime": 7, "bids": [{"price": "2", "quantity": "1"}], "asks": []}),
        );
        let exchange = exchange(transport, true);

        let book = exchange.fetch_order_book("MTL/BTC", Some(5)).await.unwrap();
        assert_eq!(book.symbol, "MTL/BTC");
        assert_eq!(book.nonce, Some(7));

        let requests = exchange.transport().requests();
        let depth = requests.last().unwrap();
        assert_eq!(query_of(&depth.url).as_deref(), Some("limit=5&symbol=MTLBTC"));
        assert!(depth.headers.is_empty());
    }

    #[tokio::test]
    async fn test_private_requests_are_signed() {
        let transport = MockTransport::default().route(
            "account",
            200,
            json!({"balances": [{"asset": "btc", "free": "1", "locked": "0.5"}]}),
        );
        let exchange = exchange(transport, true);

        let balances = exchange.fetch_balance().await.unwrap();
        assert_eq!(balances.get("BTC").unwrap().total, dec!(1.5));

        let requests = exchange.transport().requests();
        let request = requests.last().unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.header("MX-API-KEY"), Some("key"));
        assert_eq!(request.header("MX-API-USER"), Some("user"));

        let nonce: u64 = request.header("MX-NONCE").unwrap().parse().unwrap();
        let expected = RequestSigner::new("key", "user", "secret").sign(nonce).unwrap();
        assert_eq!(request.header("MX-SIGNATURE"), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn test_nonces_increase_across_calls() {
        let transport = MockTransport::default().route("account", 200, json!({"balances": []}));
        let exchange = exchange(transport, true);

        exchange.fetch_balance().await.unwrap();
        exchange.fetch_balance().await.unwrap();

        let nonces: Vec<u64> = exchange
            .transport()
            .requests()
            .iter()
            .filter_map(|r| r.header("MX-NONCE").and_then(|n| n.parse().ok()))
            .collect();
        assert_eq!(nonces.len(), 2);
        assert!(nonces[1] > nonces[0]);
    }

    #[tokio::test]
    async fn test_create_order_body() {
        let transport = MockTransport::default().route(
            "orders",
            200,
            json!({
                "orderId": "555", "symbol": "MTLBTC", "type": "LIMIT", "side": "BUY",
                "price": "0.0005", "quantity": "1.5", "executedQuantity": "0",
                "status": "New", "time": 1_700_000_000_000_i64
            }),
        );
        let exchange = exchange(transport, true);

        let order = exchange
            .create_order(
                OrderRequest::limit("MTL/BTC", OrderSide::Buy, dec!(1.5), dec!(0.0005))
                    .with_param("clientTag", "x"),
            )
            .await
            .unwrap();
        assert_eq!(order.id, "555");
        assert_eq!(order.symbol.as_deref(), Some("MTL/BTC"));
        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(order.remaining, Some(dec!(1.5)));

        let requests = exchange.transport().requests();
        let request = requests.last().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(query_of(&request.url), None);
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "symbol": "MTLBTC", "side": "BUY", "type": "LIMIT",
                "quantity": "1.5", "price": "0.0005", "clientTag": "x"
            })
        );
    }

    #[tokio::test]
    async fn test_cancel_order_uses_put() {
        let transport = MockTransport::default().route(
            "orders/cancel",
            200,
            json!({"orderId": "9", "symbol": "MTLBTC", "status": "Canceled"}),
        );
        let exchange = exchange(transport, true);

        let order = exchange.cancel_order("9", "MTL/BTC").await.unwrap();
        assert_eq!(order.status, OrderStatus::Canceled);

        let requests = exchange.transport().requests();
        let request = requests.last().unwrap();
        assert_eq!(request.method, HttpMethod::Put);
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"orderId": "9", "symbol": "MTLBTC"}));
    }

    #[tokio::test]
    async fn test_fetch_order_path_placeholder() {
        let transport = MockTransport::default().route(
            "orders/123",
            200,
            json!({"orderId": 123, "status": "FullyExecuted", "symbol": "MTLBTC"}),
        );
        let exchange = exchange(transport, true);

        let order = exchange.fetch_order("123", None).await.unwrap();
        assert_eq!(order.id, "123");
        assert_eq!(order.status, OrderStatus::Closed);
        assert_eq!(
            exchange.transport().paths(),
            vec!["assets", "exchange-info", "orders/123"]
        );
        assert_eq!(order.symbol.as_deref(), Some("MTL/BTC"));
    }

    #[tokio::test]
    async fn test_private_fetches_resolve_through_loaded_markets() {
        let transport = MockTransport::default()
            .route(
                "trades/me",
                200,
                json!([{"id": 1, "symbol": "MTLBTC", "price": "0.1", "quantity": "2"}]),
            )
            .route(
                "orders",
                200,
                json!([{"orderId": "5", "symbol": "MTLBTC", "status": "New"}]),
            );
        let exchange = exchange(transport, true);

        let trades = exchange.fetch_my_trades(None, None, None).await.unwrap();
        assert_eq!(trades[0].symbol.as_deref(), Some("MTL/BTC"));

        let orders = exchange.fetch_orders(None, None, None).await.unwrap();
        assert_eq!(orders[0].symbol.as_deref(), Some("MTL/BTC"));
        assert_eq!(
            exchange.transport().paths(),
            vec!["assets", "exchange-info", "trades/me", "orders"]
        );
    }

    #[tokio::test]
    async fn test_concurrent_first_loads_fetch_once() {
        let exchange = exchange(MockTransport::default(), false);

        let (first, second) =
            tokio::join!(exchange.load_markets(false), exchange.load_markets(false));
        assert_eq!(first.unwrap().len(), 1);
        assert_eq!(second.unwrap()[0].symbol, "MTL/BTC");
        assert_eq!(exchange.transport().paths(), vec!["assets", "exchange-info"]);
    }

    #[tokio::test]
    async fn test_open_and_closed_orders_filter() {
        let transport = MockTransport::default().route(
            "orders",
            200,
            json!([
                {"orderId": "1", "status": "New"},
                {"orderId": "2", "status": "FullyExecuted"},
                {"orderId": "3", "status": "Rejected"},
                {"orderId": "4", "status": "Pending2Fa"}
            ]),
        );
        let exchange = exchange(transport, true);

        let open = exchange.fetch_open_orders(None, None, None).await.unwrap();
        assert_eq!(open.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(), vec!["1"]);

        let closed = exchange.fetch_closed_orders(None, None, None).await.unwrap();
        assert_eq!(closed.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(), vec!["2", "3"]);
    }

    #[tokio::test]
    async fn test_fetch_ohlcv_query() {
        let transport = MockTransport::default().route(
            "ohlcv",
            200,
            json!([[1_700_000_000_000_i64, "1", "2", "0.5", "1.5", "10"]]),
        );
        let exchange = exchange(transport, false);

        let candles = exchange
            .fetch_ohlcv("MTL/BTC", "1h", Some(Timestamp::from_millis(1000)), Some(2))
            .await
            .unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].close, dec!(1.5));

        let requests = exchange.transport().requests();
        assert_eq!(
            query_of(&requests.last().unwrap().url).as_deref(),
            Some("interval=1h&limit=2&startTime=1000&symbol=MTLBTC")
        );
    }

    #[tokio::test]
    async fn test_withdraw_fills_known_fields() {
        let transport = MockTransport::default().route(
            "withdraw",
            200,
            json!({"id": "w1", "status": "Processing"}),
        );
        let exchange = exchange(transport, true);

        let tx = exchange
            .withdraw("BTC", dec!(0.1), "addr", Some("memo"))
            .await
            .unwrap();
        assert_eq!(tx.id.as_deref(), Some("w1"));
        assert_eq!(tx.currency.as_deref(), Some("BTC"));
        assert_eq!(tx.amount, Some(dec!(0.1)));
        assert_eq!(tx.status, Some(TransactionStatus::Pending));

        let requests = exchange.transport().requests();
        let body = requests.last().unwrap().body.as_deref().unwrap();
        let body: Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            body,
            json!({"asset": "btc", "amount": "0.1", "address": "addr", "tag": "memo"})
        );
    }

    #[tokio::test]
    async fn test_error_response_is_classified() {
        let transport = MockTransport::default().route(
            "account",
            429,
            json!({"code": "rate_limit_exceeded", "message": "slow down"}),
        );
        let exchange = exchange(transport, true);

        let err = exchange.fetch_balance().await.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(
            err.as_exchange_error(),
            Some(ExchangeError::RateLimited { status: 429, .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_is_data_error() {
        let transport = MockTransport::default();
        transport
            .routes
            .lock()
            .insert("tickers".to_string(), HttpResponse::new(200, "not json"));
        let exchange = exchange(transport, false);

        let err = exchange.fetch_tickers(None).await.unwrap_err();
        assert!(matches!(err, MxError::Data(DataError::JsonError { .. })));
    }

    #[tokio::test]
    async fn test_fetch_tickers_filters_symbols() {
        let transport = MockTransport::default().route(
            "tickers",
            200,
            json!([
                {"symbol": "MTLBTC", "lastPrice": "2", "openPrice": "1"},
                {"symbol": "OTHER", "lastPrice": "5"}
            ]),
        );
        let exchange = exchange(transport, false);

        let all = exchange.fetch_tickers(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].symbol, None);

        let only = exchange.fetch_tickers(Some(&["MTL/BTC"])).await.unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].percentage, Some(dec!(100)));
    }
}
