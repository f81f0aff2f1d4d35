//! # wallet-analytics
//!
//! Historical trend analysis and wallet-age classification over ingested
//! cryptocurrency wallet records.
//!
//! ## Trend reconstruction
//!
//! Only current balances and the transaction log are known. The balance at
//! the start of each lookback window is recovered by undoing the activity
//! that happened inside the window:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  current {ETH: 3.0}                                          │
//! │  receive 1.0 ETH, 10 days ago                                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  30-day window   start {ETH: 2.0}  → increase  ETH: +1       │
//! │  90-day window   start {ETH: 2.0}  → increase  ETH: +1       │
//! │  180-day window  start {ETH: 2.0}  → increase  ETH: +1       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deltas are summed in raw token units; no prices are involved.
//!
//! ## Known limitation
//!
//! A token that was fully divested before a window began and is absent
//! from the current balances leaves no trace in that window, so it never
//! shows up as a notable change there.
//!
//! Start-of-window balances roll back only the activity inside the window.
//! This is not the older reconstruction, which reversed every transaction
//! recorded before the cutoff (subtracting sends). The two agree only
//! when no transaction predates the window.

pub mod age;
pub mod error;
pub mod model;
pub mod narrative;
pub mod report;
pub mod source;
pub mod svckit;
pub mod trend;

pub use age::{WalletAgeReport, WalletCategory};
pub use error::{AnalyticsError, Result};
pub use model::{BalanceMap, TokenBalance, Transaction, TransactionKind, WalletRecord};
pub use report::{FileReportSink, MemoryReportSink, ReportSink};
pub use source::{MemoryWalletStore, WalletRecordSource};
pub use svckit::{TrendAnalysis, TrendAnalysisService, WalletAgeService};
pub use trend::{OverallChange, TrendEngine, TrendReport, TrendResult, Window};
