//! In-memory wallet store
//!
//! Holds documents keyed by address. Seeded from a JSON file of records and
//! updated by upsert, the same way ingestion writes documents.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::WalletRecordSource;
use crate::error::Result;
use crate::model::WalletRecord;

/// Whether an upsert created or replaced a document
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

#[derive(Default)]
pub struct MemoryWalletStore {
    records: RwLock<HashMap<String, WalletRecord>>,
}

impl MemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with records; each must validate
    pub fn with_records(records: impl IntoIterator<Item = WalletRecord>) -> Result<Self> {
        let mut map = HashMap::new();
        for record in records {
            record.validate()?;
            map.insert(record.wallet_address.clone(), record);
        }
        Ok(Self {
            records: RwLock::new(map),
        })
    }

    /// Load a JSON array of wallet documents. A missing file gives an empty store.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "wallet data file not found, starting empty");
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records: Vec<WalletRecord> = serde_json::from_str(&raw)?;
        tracing::info!(path = %path.display(), wallets = records.len(), "loaded wallet records");
        Self::with_records(records)
    }

    /// Replace the document for the address if present, insert it otherwise
    pub async fn upsert(&self, record: WalletRecord) -> Result<Upsert> {
        record.validate()?;
        let address = record.wallet_address.clone();
        let previous = self.records.write().await.insert(address.clone(), record);

        let outcome = if previous.is_some() { Upsert::Updated } else { Upsert::Inserted };
        tracing::info!(wallet = %address, ?outcome, "wallet record saved");
        Ok(outcome)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl WalletRecordSource for MemoryWalletStore {
    async fn lookup(&self, wallet_address: &str) -> Result<Option<WalletRecord>> {
        Ok(self.records.read().await.get(wallet_address).cloned())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_lookup_and_require() {
        let store = MemoryWalletStore::with_records([WalletRecord::new("0xAAA").with_balance("ETH", dec!(1))]).unwrap();

        assert!(store.lookup("0xAAA").await.unwrap().is_some());
        assert!(store.lookup("0xBBB").await.unwrap().is_none());
        assert!(matches!(
            store.require("0xBBB").await,
            Err(AnalyticsError::MissingWalletRecord(addr)) if addr == "0xBBB"
        ));
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates() {
        let store = MemoryWalletStore::new();
        let record = WalletRecord::new("0xAAA").with_balance("ETH", dec!(1));

        assert_eq!(store.upsert(record.clone()).await.unwrap(), Upsert::Inserted);
        assert_eq!(store.upsert(record.with_balance("USDT", dec!(5))).await.unwrap(), Upsert::Updated);
        assert_eq!(store.len().await, 1);

        let stored = store.require("0xAAA").await.unwrap();
        assert_eq!(stored.token_balances.len(), 2);
    }

    #[tokio::test]
    async fn test_upsert_rejects_invalid_record() {
        let store = MemoryWalletStore::new();
        let record = WalletRecord::new("0xAAA")
            .with_balance("ETH", dec!(1))
            .with_balance("ETH", dec!(1));
        assert!(store.upsert(record).await.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_file_gives_empty_store() {
        let path = std::env::temp_dir().join(format!("no-such-wallets-{}.json", uuid::Uuid::new_v4()));
        let store = MemoryWalletStore::from_json_file(path).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_load_from_json_file() {
        let path = std::env::temp_dir().join(format!("wallets-{}.json", uuid::Uuid::new_v4()));
        let raw = r#"[{"wallet_address": "0xAAA", "token_balances": [{"symbol": "ETH", "balance": 2.5}],
                      "transaction_history": [{"timestamp": 1708060800, "token": "ETH", "amount": 0.5, "type": "receive"}]}]"#;
        tokio::fs::write(&path, raw).await.unwrap();

        let store = MemoryWalletStore::from_json_file(&path).await.unwrap();
        let record = store.require("0xAAA").await.unwrap();
        assert_eq!(record.current_balances()["ETH"], dec!(2.5));
        assert_eq!(record.transaction_history.len(), 1);

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
