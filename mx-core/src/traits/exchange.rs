//! Unified exchange interface and API credentials.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt;

use crate::data::{
    Balances, Currency, DepositAddress, Market, Ohlcv, Order, OrderBook, OrderRequest, Ticker,
    Trade, Transaction,
};
use crate::error::{ConfigError, Result};
use crate::types::Timestamp;

/// API credentials for private endpoints.
///
/// The secret is only reachable through [`Credentials::api_secret`] and is
/// redacted from the `Debug` output.
///
/// # Examples
///
/// ```
/// use mx_core::traits::Credentials;
///
/// let creds = Credentials::new("key", "user", "hunter2");
/// assert!(creds.require().is_ok());
/// assert!(!format!("{creds:?}").contains("hunter2"));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// API key.
    pub api_key: Option<String>,
    /// API user id.
    pub api_user: Option<String>,
    api_secret: Option<String>,
}

impl Credentials {
    /// Creates a complete set of credentials.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        api_user: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_user: Some(api_user.into()),
            api_secret: Some(api_secret.into()),
        }
    }

    /// Sets the API secret.
    #[must_use]
    pub fn with_secret(mut self, api_secret: impl Into<String>) -> Self {
        self.api_secret = Some(api_secret.into());
        self
    }

    /// Returns the API secret.
    #[must_use]
    pub fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_deref()
    }

    /// Returns `(api_key, api_user, api_secret)`, or a
    /// [`ConfigError::MissingField`] naming the first absent or empty value.
    pub fn require(&self) -> std::result::Result<(&str, &str, &str), ConfigError> {
        fn field<'a>(
            value: Option<&'a str>,
            name: &str,
        ) -> std::result::Result<&'a str, ConfigError> {
            value
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::missing_field_in_section(name, "credentials"))
        }

        Ok((
            field(self.api_key.as_deref(), "api_key")?,
            field(self.api_user.as_deref(), "api_user")?,
            field(self.api_secret.as_deref(), "api_secret")?,
        ))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_user", &self.api_user)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Unified trading interface.
///
/// Symbols are canonical (`BASE/QUOTE`) and currency codes are canonical
/// codes. Argument problems are reported before any request is sent.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Returns the exchange identifier.
    fn id(&self) -> &'static str;

    /// Loads markets and currencies once; `reload` forces a refresh.
    async fn load_markets(&self, reload: bool) -> Result<Vec<Market>>;

    /// Fetches all markets.
    async fn fetch_markets(&self) -> Result<Vec<Market>>;

    /// Fetches all currencies.
    async fn fetch_currencies(&self) -> Result<Vec<Currency>>;

    /// Fetches the ticker of one market.
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker>;

    /// Fetches tickers, optionally restricted to `symbols`.
    async fn fetch_tickers(&self, symbols: Option<&[&str]>) -> Result<Vec<Ticker>>;

    /// Fetches the order book of one market.
    async fn fetch_order_book(&self, symbol: &str, limit: Option<u32>) -> Result<OrderBook>;

    /// Fetches recent public trades.
    async fn fetch_trades(
        &self,
        symbol: &str,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>>;

    /// Fetches candles; `timeframe` must be a supported interval.
    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        timeframe: &str,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Ohlcv>>;

    /// Fetches account balances.
    async fn fetch_balance(&self) -> Result<Balances>;

    /// Fetches deposits.
    async fn fetch_deposits(
        &self,
        code: Option<&str>,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>>;

    /// Fetches withdrawals.
    async fn fetch_withdrawals(
        &self,
        code: Option<&str>,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>>;

    /// Fetches orders in any state.
    async fn fetch_orders(
        &self,
        symbol: Option<&str>,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>>;

    /// Fetches open orders.
    async fn fetch_open_orders(
        &self,
        symbol: Option<&str>,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>>;

    /// Fetches closed orders.
    async fn fetch_closed_orders(
        &self,
        symbol: Option<&str>,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>>;

    /// Fetches one order.
    async fn fetch_order(&self, id: &str, symbol: Option<&str>) -> Result<Order>;

    /// Fetches the account's own trades.
    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<Timestamp>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>>;

    /// Fetches the deposit address of a currency.
    async fn fetch_deposit_address(&self, code: &str) -> Result<DepositAddress>;

    /// Places an order.
    async fn create_order(&self, request: OrderRequest) -> Result<Order>;

    /// Cancels an order.
    async fn cancel_order(&self, id: &str, symbol: &str) -> Result<Order>;

    /// Requests a withdrawal.
    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
    ) -> Result<Transaction>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_complete() {
        let creds = Credentials::new("k", "u", "s");
        assert_eq!(creds.require().unwrap(), ("k", "u", "s"));
    }

    #[test]
    fn test_require_reports_first_missing_field() {
        let creds = Credentials {
            api_key: Some("k".to_string()),
            api_user: None,
            api_secret: None,
        };
        assert_eq!(
            creds.require().unwrap_err(),
            ConfigError::missing_field_in_section("api_user", "credentials")
        );

        let empty_key = Credentials::new("", "u", "s");
        assert!(matches!(
            empty_key.require(),
            Err(ConfigError::MissingField { ref field, .. }) if field == "api_key"
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::default().with_secret("topsecret");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("***"));
    }
}
