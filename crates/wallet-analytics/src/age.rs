//! Wallet Age Classification
//!
//! Works out when a wallet first transacted, how old that makes it, and
//! which experience bucket it falls into. Calendar arithmetic is the
//! simplified one used throughout the reports: a year is 365 days and a
//! month is 30 days.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::model::WalletRecord;

const DAYS_PER_YEAR: i64 = 365;
const DAYS_PER_MONTH: i64 = 30;

/// Experience bucket by full years of activity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletCategory {
    /// 5+ years
    Veteran,
    /// 2-5 years
    Established,
    /// 1-2 years
    Intermediate,
    /// Less than a year
    Newcomer,
}

impl WalletCategory {
    pub fn from_years(years: i64) -> Self {
        match years {
            y if y >= 5 => WalletCategory::Veteran,
            y if y >= 2 => WalletCategory::Established,
            1 => WalletCategory::Intermediate,
            _ => WalletCategory::Newcomer,
        }
    }

    /// Fallback interpretation when no text-generation service answers
    pub fn interpretation(self) -> &'static str {
        match self {
            WalletCategory::Veteran => {
                "The holder has been active across several market cycles and is likely an experienced participant."
            }
            WalletCategory::Established => {
                "The holder has sustained activity through at least one full market cycle and shows a settled track record."
            }
            WalletCategory::Intermediate => {
                "The holder has more than a year of on-chain history and is building experience."
            }
            WalletCategory::Newcomer => {
                "The wallet is recent; the holder has limited on-chain history so far."
            }
        }
    }
}

impl std::fmt::Display for WalletCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            WalletCategory::Veteran => "Veteran",
            WalletCategory::Established => "Established",
            WalletCategory::Intermediate => "Intermediate",
            WalletCategory::Newcomer => "Newcomer",
        };
        f.write_str(label)
    }
}

/// Age split into years, months and days
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAge {
    pub years: i64,
    pub months: i64,
    pub days: i64,
}

impl WalletAge {
    pub fn from_days(total_days: i64) -> Self {
        let total_days = total_days.max(0);
        let remainder = total_days % DAYS_PER_YEAR;
        Self {
            years: total_days / DAYS_PER_YEAR,
            months: remainder / DAYS_PER_MONTH,
            days: remainder % DAYS_PER_MONTH,
        }
    }

    pub fn category(&self) -> WalletCategory {
        WalletCategory::from_years(self.years)
    }
}

impl std::fmt::Display for WalletAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn unit(n: i64, singular: &str) -> String {
            if n == 1 { format!("{n} {singular}") } else { format!("{n} {singular}s") }
        }
        write!(
            f,
            "{}, {}, {}",
            unit(self.years, "year"),
            unit(self.months, "month"),
            unit(self.days, "day")
        )
    }
}

/// Computed facts about a wallet's age
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAgeFacts {
    pub first_transaction: NaiveDate,
    pub age: WalletAge,
    pub category: WalletCategory,
}

impl WalletAgeFacts {
    pub fn into_report(self, analysis: impl Into<String>) -> WalletAgeReport {
        WalletAgeReport {
            first_transaction: self.first_transaction.format("%Y-%m-%d").to_string(),
            wallet_age: self.age.to_string(),
            category: self.category,
            analysis: analysis.into(),
        }
    }
}

/// Wallet-age result in its published shape
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAgeReport {
    #[serde(rename = "First Transaction")]
    pub first_transaction: String,

    #[serde(rename = "Wallet Age")]
    pub wallet_age: String,

    #[serde(rename = "Category")]
    pub category: WalletCategory,

    #[serde(rename = "Analysis")]
    pub analysis: String,
}

impl WalletAgeReport {
    /// Parse a structured reply, tolerating prose or code fences around the object
    pub fn parse_reply(reply: &str) -> Result<Self> {
        let start = reply.find('{');
        let end = reply.rfind('}');
        let body = match (start, end) {
            (Some(s), Some(e)) if s < e => &reply[s..=e],
            _ => reply,
        };
        Ok(serde_json::from_str(body)?)
    }
}

/// Parse explorer strings such as "5 days ago", "1 yr 27 days ago" or "3 hrs ago".
///
/// `None` for anything unrecognised or too large for a timestamp.
pub fn parse_relative_age(text: &str) -> Option<Duration> {
    let mut tokens = text
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .filter(|t| t != "ago" && t != "and");

    let mut total = Duration::zero();
    let mut matched = false;

    while let Some(token) = tokens.next() {
        let amount: i64 = if token == "a" || token == "an" { 1 } else { token.parse().ok()? };
        let unit = tokens.next()?;
        let unit = unit.trim_end_matches(',');

        let step = match unit {
            "yr" | "yrs" | "year" | "years" => Duration::try_days(amount.checked_mul(DAYS_PER_YEAR)?),
            "mo" | "mos" | "mth" | "mths" | "month" | "months" => {
                Duration::try_days(amount.checked_mul(DAYS_PER_MONTH)?)
            }
            "wk" | "wks" | "week" | "weeks" => Duration::try_weeks(amount),
            "day" | "days" => Duration::try_days(amount),
            "hr" | "hrs" | "hour" | "hours" => Duration::try_hours(amount),
            "min" | "mins" | "minute" | "minutes" => Duration::try_minutes(amount),
            "sec" | "secs" | "second" | "seconds" => Duration::try_seconds(amount),
            _ => return None,
        }?;
        total = total.checked_add(&step)?;
        matched = true;
    }

    matched.then_some(total)
}

/// Earliest activity: the oldest transaction, or the explorer's "first" hint
pub fn first_activity(record: &WalletRecord, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let from_history = record
        .transaction_history
        .iter()
        .filter_map(|tx| tx.occurred_at())
        .min();

    from_history.or_else(|| {
        record
            .wallet_ages
            .as_ref()
            .and_then(|ages| ages.first.as_deref())
            .and_then(parse_relative_age)
            .and_then(|ago| now.checked_sub_signed(ago))
    })
}

/// Age facts for a wallet as of `now`
pub fn classify_wallet_age(record: &WalletRecord, now: DateTime<Utc>) -> Result<WalletAgeFacts> {
    let first = first_activity(record, now)
        .ok_or_else(|| AnalyticsError::UnknownWalletAge(record.wallet_address.clone()))?;

    let first_transaction = first.date_naive();
    let total_days = (now.date_naive() - first_transaction).num_days();
    let age = WalletAge::from_days(total_days);

    Ok(WalletAgeFacts {
        first_transaction,
        age,
        category: age.category(),
    })
}
