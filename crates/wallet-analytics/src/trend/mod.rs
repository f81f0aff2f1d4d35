//! Historical Trend Analysis
//!
//! Reconstructs what a wallet held at the start of each lookback window by
//! walking its current balances back through the ledger, then classifies the
//! change.
//!
//! ```text
//!  now - 180d          now - 90d          now - 30d            now
//!      │                   │                  │                 │
//!  ────┼───────────────────┼──────────────────┼─────────────────┤
//!      └──── 180-day window: every tx in here is reversed ──────┘
//!                          └──── 90-day window ─────────────────┘
//!                                             └── 30-day window ┘
//! ```
//!
//! The functions in [`ledger`], [`delta`] and [`patterns`] are pure; only
//! [`TrendEngine`] emits log events.

pub mod delta;
pub mod engine;
pub mod ledger;
pub mod patterns;

pub use delta::{notable_changes, portfolio_value_change, OverallChange};
pub use engine::{TrendEngine, TrendReport, TrendResult};
pub use ledger::{filter_window, missing_baselines, reconstruct_initial_balances, window_cutoff};
pub use patterns::TransactionPatterns;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// Lookback windows used when none are configured
pub const DEFAULT_WINDOWS: [u32; 3] = [30, 90, 180];

/// Longest accepted window, about a century
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// A lookback period in days, between 1 and [`MAX_WINDOW_DAYS`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Window(u32);

impl Window {
    pub fn days(days: u32) -> Result<Self> {
        match days {
            0 => Err(AnalyticsError::InvalidWindow("window must be at least one day".into())),
            d if d > MAX_WINDOW_DAYS => Err(AnalyticsError::InvalidWindow(format!(
                "{d} days exceeds the {MAX_WINDOW_DAYS}-day maximum"
            ))),
            d => Ok(Self(d)),
        }
    }

    pub fn as_days(self) -> u32 {
        self.0
    }

    /// Label used in reports and serialized output, e.g. "30_day_trend"
    pub fn key(self) -> String {
        format!("{}_day_trend", self.0)
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-day", self.0)
    }
}

impl TryFrom<u32> for Window {
    type Error = AnalyticsError;

    fn try_from(days: u32) -> Result<Self> {
        Self::days(days)
    }
}

impl From<Window> for u32 {
    fn from(window: Window) -> Self {
        window.0
    }
}

impl std::str::FromStr for Window {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        let days = s
            .trim()
            .parse::<u32>()
            .map_err(|e| AnalyticsError::InvalidWindow(format!("'{s}': {e}")))?;
        Self::days(days)
    }
}
