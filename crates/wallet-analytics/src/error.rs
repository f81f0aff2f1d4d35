//! Error Types for Wallet Analytics

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// The record source has no document for this address. Not retried.
    #[error("No wallet record for address {0}")]
    MissingWalletRecord(String),

    #[error("Invalid wallet record {address}: {reason}")]
    InvalidRecord { address: String, reason: String },

    #[error("Invalid trend window: {0}")]
    InvalidWindow(String),

    #[error("Cannot determine wallet age for {0}: no transactions and no first-seen hint")]
    UnknownWalletAge(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Text generation error: {0}")]
    Provider(#[from] agent_core::AgentError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalyticsError {
    /// Whether the failure came from upstream data rather than from this process
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            AnalyticsError::MissingWalletRecord(_)
                | AnalyticsError::InvalidRecord { .. }
                | AnalyticsError::UnknownWalletAge(_)
        )
    }
}
