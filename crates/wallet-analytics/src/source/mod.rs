//! Wallet Record Sources
//!
//! Abstractions over wherever ingested wallet documents live.

mod memory;

pub use memory::{MemoryWalletStore, Upsert};

use async_trait::async_trait;

use crate::error::{AnalyticsError, Result};
use crate::model::WalletRecord;

/// Read side of the wallet document store (Strategy pattern)
///
/// Implement this for each backing store. A miss is `Ok(None)`; errors are
/// reserved for the store itself failing.
#[async_trait]
pub trait WalletRecordSource: Send + Sync {
    async fn lookup(&self, wallet_address: &str) -> Result<Option<WalletRecord>>;

    /// Lookup that turns a miss into [`AnalyticsError::MissingWalletRecord`]
    async fn require(&self, wallet_address: &str) -> Result<WalletRecord> {
        self.lookup(wallet_address)
            .await?
            .ok_or_else(|| AnalyticsError::MissingWalletRecord(wallet_address.to_string()))
    }

    /// Source name
    fn name(&self) -> &str;
}
