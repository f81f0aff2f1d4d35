//! Domain Models
//!
//! Wallet documents as stored by the ingestion side, plus the balance map
//! the trend engine works on. All quantities are `rust_decimal` values.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// Symbol → quantity. Ordered so reports and serialized output are stable.
pub type BalanceMap = BTreeMap<String, Decimal>;

/// Largest magnitude accepted for a balance or transfer amount (10^20).
///
/// Sums over any realistic ledger stay far inside `Decimal`'s range.
pub const MAX_QUANTITY: Decimal = dec!(100000000000000000000);

/// Direction of a transfer relative to the tracked wallet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Send,
    Receive,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Send => write!(f, "send"),
            TransactionKind::Receive => write!(f, "receive"),
        }
    }
}

/// A single ledger entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unix epoch seconds
    pub timestamp: i64,

    /// Token symbol (e.g., "ETH", "USDT")
    pub token: String,

    /// Transferred quantity, never negative
    pub amount: Decimal,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// "native", "ERC-20", ...
    #[serde(default)]
    pub asset_type: String,

    #[serde(default)]
    pub from: String,

    #[serde(default)]
    pub to: String,

    #[serde(default)]
    pub tx_hash: String,
}

impl Transaction {
    pub fn new(timestamp: i64, token: impl Into<String>, amount: Decimal, kind: TransactionKind) -> Self {
        Self {
            timestamp,
            token: token.into(),
            amount,
            kind,
            asset_type: String::new(),
            from: String::new(),
            to: String::new(),
            tx_hash: String::new(),
        }
    }

    pub fn send(timestamp: i64, token: impl Into<String>, amount: Decimal) -> Self {
        Self::new(timestamp, token, amount, TransactionKind::Send)
    }

    pub fn receive(timestamp: i64, token: impl Into<String>, amount: Decimal) -> Self {
        Self::new(timestamp, token, amount, TransactionKind::Receive)
    }

    /// Timestamp as a UTC instant, `None` if out of chrono's range
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.timestamp, 0).single()
    }
}

/// Current balance of one held asset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub symbol: String,
    pub balance: Decimal,
}

impl TokenBalance {
    pub fn new(symbol: impl Into<String>, balance: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            balance,
        }
    }
}

/// Token metadata captured alongside balances
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub symbol: String,

    /// Contract address, "native" for the chain's own coin
    #[serde(default)]
    pub contract_address: String,

    #[serde(default)]
    pub decimals: u8,
}

/// Relative first/latest activity strings as shown by the block explorer
/// (e.g., "5 days ago")
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAges {
    #[serde(default)]
    pub latest: Option<String>,

    #[serde(default)]
    pub first: Option<String>,
}

/// A wallet document as produced by ingestion
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletRecord {
    pub wallet_address: String,

    #[serde(default)]
    pub tokens_held: Vec<TokenHolding>,

    #[serde(default)]
    pub token_balances: Vec<TokenBalance>,

    #[serde(default)]
    pub wallet_ages: Option<WalletAges>,

    #[serde(default)]
    pub transaction_history: Vec<Transaction>,
}

impl WalletRecord {
    pub fn new(wallet_address: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            tokens_held: Vec::new(),
            token_balances: Vec::new(),
            wallet_ages: None,
            transaction_history: Vec::new(),
        }
    }

    pub fn with_balance(mut self, symbol: impl Into<String>, balance: Decimal) -> Self {
        self.token_balances.push(TokenBalance::new(symbol, balance));
        self
    }

    pub fn with_transaction(mut self, tx: Transaction) -> Self {
        self.transaction_history.push(tx);
        self
    }

    /// Current balances keyed by symbol
    pub fn current_balances(&self) -> BalanceMap {
        self.token_balances
            .iter()
            .map(|b| (b.symbol.clone(), b.balance))
            .collect()
    }

    /// Check the invariants the engine relies on
    pub fn validate(&self) -> Result<()> {
        if self.wallet_address.trim().is_empty() {
            return Err(self.invalid("empty wallet address"));
        }

        let mut seen = BTreeSet::new();
        for balance in &self.token_balances {
            if !seen.insert(balance.symbol.as_str()) {
                return Err(self.invalid(format!("duplicate balance for {}", balance.symbol)));
            }
            if balance.balance.abs() > MAX_QUANTITY {
                return Err(self.invalid(format!("balance of {} out of range", balance.symbol)));
            }
        }

        if let Some(tx) = self.transaction_history.iter().find(|tx| tx.amount < Decimal::ZERO) {
            return Err(self.invalid(format!(
                "negative amount {} {} in transaction {}",
                tx.amount, tx.token, tx.tx_hash
            )));
        }

        if let Some(tx) = self.transaction_history.iter().find(|tx| tx.amount > MAX_QUANTITY) {
            return Err(self.invalid(format!("amount of {} in transaction {} out of range", tx.token, tx.tx_hash)));
        }

        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> AnalyticsError {
        AnalyticsError::InvalidRecord {
            address: self.wallet_address.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const EXPLORER_DOC: &str = r#"{
        "wallet_address": "0xABC123",
        "tokens_held": [
            {"symbol": "USDT", "contract_address": "0xdAC17F958D2ee523a2206206994597C13D831ec7", "decimals": 6},
            {"symbol": "ETH", "contract_address": "native", "decimals": 18}
        ],
        "token_balances": [
            {"symbol": "USDT", "balance": 1250.50},
            {"symbol": "ETH", "balance": 3.412}
        ],
        "wallet_ages": {"latest": "2 days ago", "first": "5 days ago"},
        "transaction_history": [
            {"timestamp": 1708060800, "tx_hash": "0x1234abc", "token": "ETH", "amount": 0.25,
             "type": "send", "asset_type": "native", "from": "0xABC123", "to": "0xDEF456"},
            {"timestamp": 1708057200, "tx_hash": "0x789xyz", "token": "USDT", "amount": 500,
             "type": "receive", "asset_type": "ERC-20", "from": "0xGHI789", "to": "0xABC123"}
        ]
    }"#;

    #[test]
    fn test_parse_explorer_document() {
        let record: WalletRecord = serde_json::from_str(EXPLORER_DOC).unwrap();
        assert_eq!(record.wallet_address, "0xABC123");
        assert_eq!(record.transaction_history.len(), 2);
        assert_eq!(record.transaction_history[0].kind, TransactionKind::Send);
        assert_eq!(record.transaction_history[0].amount, dec!(0.25));
        assert_eq!(record.transaction_history[1].kind, TransactionKind::Receive);

        let balances = record.current_balances();
        assert_eq!(balances["USDT"], dec!(1250.50));
        assert_eq!(balances["ETH"], dec!(3.412));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_unknown_transaction_type_rejected() {
        let raw = r#"{"timestamp": 1, "token": "ETH", "amount": 1, "type": "swap"}"#;
        assert!(serde_json::from_str::<Transaction>(raw).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_negative_amounts() {
        let dup = WalletRecord::new("0x1")
            .with_balance("ETH", dec!(1))
            .with_balance("ETH", dec!(2));
        assert!(matches!(dup.validate(), Err(AnalyticsError::InvalidRecord { .. })));

        let negative = WalletRecord::new("0x1").with_transaction(Transaction::send(0, "ETH", dec!(-1)));
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_quantities() {
        let huge_balance = WalletRecord::new("0x1").with_balance("ETH", Decimal::MAX);
        assert!(matches!(huge_balance.validate(), Err(AnalyticsError::InvalidRecord { .. })));

        let huge_debt = WalletRecord::new("0x1").with_balance("ETH", Decimal::MIN);
        assert!(huge_debt.validate().is_err());

        let huge_amount = WalletRecord::new("0x1").with_transaction(Transaction::send(0, "ETH", MAX_QUANTITY + dec!(1)));
        assert!(huge_amount.validate().is_err());

        let at_limit = WalletRecord::new("0x1")
            .with_balance("ETH", MAX_QUANTITY)
            .with_transaction(Transaction::receive(0, "ETH", MAX_QUANTITY));
        assert!(at_limit.validate().is_ok());
    }
}
