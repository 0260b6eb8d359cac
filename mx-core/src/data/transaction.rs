//! Deposits, withdrawals and deposit addresses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::Fee;
use crate::types::Timestamp;

/// Direction of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Incoming transfer
    Deposit,
    /// Outgoing transfer
    Withdrawal,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => f.write_str("deposit"),
            Self::Withdrawal => f.write_str("withdrawal"),
        }
    }
}

/// Canonical transfer status, with the exchange string kept when unmapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Not yet settled
    Pending,
    /// Settled
    Ok,
    /// Failed or rejected
    Failed,
    /// Canceled before settlement
    Canceled,
    /// Unmapped exchange status, preserved as received
    Unknown(String),
}

/// A deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Exchange transfer id
    pub id: Option<String>,
    /// On-chain transaction hash
    pub txid: Option<String>,
    /// Creation time
    pub timestamp: Option<Timestamp>,
    /// Destination or source address
    pub address: Option<String>,
    /// Memo / destination tag
    pub tag: Option<String>,
    /// Deposit or withdrawal
    pub transaction_type: TransactionType,
    /// Transferred amount
    pub amount: Option<Decimal>,
    /// Currency code
    pub currency: Option<String>,
    /// Canonical status
    pub status: Option<TransactionStatus>,
    /// Network fee
    pub fee: Option<Fee>,
    /// Raw exchange payload
    pub info: Value,
}

impl Transaction {
    /// Returns the ISO-8601 creation time.
    #[must_use]
    pub fn datetime(&self) -> Option<String> {
        self.timestamp.and_then(|ts| ts.to_iso8601())
    }
}

/// Address to deposit a currency to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositAddress {
    /// Currency code
    pub currency: String,
    /// Deposit address
    pub address: String,
    /// Memo / destination tag, when the network needs one
    pub tag: Option<String>,
    /// Raw exchange payload
    pub info: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Ok).unwrap(),
            "\"ok\""
        );
        assert_eq!(TransactionType::Withdrawal.to_string(), "withdrawal");
    }
}
