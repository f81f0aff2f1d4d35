//! Service Kit - Wallet Agents
//!
//! Services that fetch a wallet record, run an analysis over it and hand
//! the result to a report sink.

mod trend_analysis;
mod wallet_age;

pub use trend_analysis::{TrendAnalysis, TrendAnalysisService};
pub use wallet_age::{WalletAgeService, WALLET_AGE_PROMPT};
