//! Multi-window orchestration

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::delta::{notable_changes, portfolio_value_change, OverallChange};
use super::ledger::{filter_window, missing_baselines, reconstruct_initial_balances};
use super::patterns::TransactionPatterns;
use super::{Window, DEFAULT_WINDOWS};
use crate::error::{AnalyticsError, Result};
use crate::model::{BalanceMap, Transaction, WalletRecord};

/// Trend over a single window
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendResult {
    pub overall_change: OverallChange,

    /// Nonzero per-symbol deltas only
    pub notable_changes: BalanceMap,

    pub transaction_patterns: TransactionPatterns,
}

impl TrendResult {
    /// Result for a window with no activity at all
    pub fn stable() -> Self {
        Self {
            overall_change: OverallChange::Stable,
            notable_changes: BalanceMap::new(),
            transaction_patterns: TransactionPatterns::default(),
        }
    }
}

/// One result per window, ascending by window length
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrendReport {
    trends: BTreeMap<Window, TrendResult>,
}

impl TrendReport {
    pub fn get(&self, window: Window) -> Option<&TrendResult> {
        self.trends.get(&window)
    }

    /// Lookup by day count
    pub fn for_days(&self, days: u32) -> Option<&TrendResult> {
        Window::days(days).ok().and_then(|w| self.get(w))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Window, &TrendResult)> {
        self.trends.iter().map(|(w, r)| (*w, r))
    }

    pub fn len(&self) -> usize {
        self.trends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trends.is_empty()
    }
}

/// Computes trend results for a fixed set of windows
#[derive(Clone, Debug)]
pub struct TrendEngine {
    windows: Vec<Window>,
}

impl Default for TrendEngine {
    fn default() -> Self {
        Self {
            windows: DEFAULT_WINDOWS.iter().map(|d| Window(*d)).collect(),
        }
    }
}

impl TrendEngine {
    /// Engine over the given windows; sorted ascending, duplicates dropped
    pub fn new(windows: impl IntoIterator<Item = Window>) -> Result<Self> {
        let mut windows: Vec<Window> = windows.into_iter().collect();
        windows.sort_unstable();
        windows.dedup();

        if windows.is_empty() {
            return Err(AnalyticsError::InvalidWindow("at least one window is required".into()));
        }
        Ok(Self { windows })
    }

    /// Engine from day counts, e.g. `[30, 90, 180]`
    pub fn with_days(days: &[u32]) -> Result<Self> {
        let windows = days.iter().map(|d| Window::days(*d)).collect::<Result<Vec<_>>>()?;
        Self::new(windows)
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// Trend for one window. Pure: same inputs and `now`, same result.
    pub fn analyze_window(
        window: Window,
        current: &BalanceMap,
        history: &[Transaction],
        now: DateTime<Utc>,
    ) -> TrendResult {
        let in_window = filter_window(history, window, now);
        if in_window.is_empty() {
            return TrendResult::stable();
        }

        let initial = reconstruct_initial_balances(current, in_window.iter().copied());
        let delta = portfolio_value_change(&initial, current);

        TrendResult {
            overall_change: OverallChange::from_delta(delta),
            notable_changes: notable_changes(&initial, current),
            transaction_patterns: TransactionPatterns::from_transactions(in_window),
        }
    }

    /// Trends for every configured window
    pub fn analyze(&self, current: &BalanceMap, history: &[Transaction], now: DateTime<Utc>) -> TrendReport {
        let missing = missing_baselines(current, history);
        if !missing.is_empty() {
            tracing::warn!(
                symbols = ?missing,
                "ledger references tokens without a current balance; using a zero baseline"
            );
        }

        let trends = self
            .windows
            .iter()
            .map(|&window| {
                let result = Self::analyze_window(window, current, history, now);
                tracing::debug!(
                    window = window.as_days(),
                    overall_change = %result.overall_change,
                    notable = result.notable_changes.len(),
                    transactions = result.transaction_patterns.total(),
                    "window analyzed"
                );
                (window, result)
            })
            .collect();

        TrendReport { trends }
    }

    pub fn analyze_record(&self, record: &WalletRecord, now: DateTime<Utc>) -> TrendReport {
        self.analyze(&record.current_balances(), &record.transaction_history, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 17, 0, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> i64 {
        (now() - Duration::days(days)).timestamp()
    }

    fn balances(entries: &[(&str, Decimal)]) -> BalanceMap {
        entries.iter().map(|(s, b)| ((*s).to_string(), *b)).collect()
    }

    fn mixed_history() -> Vec<Transaction> {
        vec![
            Transaction::receive(days_ago(3), "ETH", dec!(0.5)),
            Transaction::send(days_ago(12), "USDT", dec!(200)),
            Transaction::receive(days_ago(45), "USDT", dec!(1000)),
            Transaction::send(days_ago(100), "ETH", dec!(1.25)),
            Transaction::receive(days_ago(150), "LINK", dec!(40)),
            Transaction::send(days_ago(400), "ETH", dec!(9)),
        ]
    }

    #[test]
    fn test_scenario_single_receive() {
        let report = TrendEngine::default().analyze(
            &balances(&[("ETH", dec!(3.0))]),
            &[Transaction::receive(days_ago(10), "ETH", dec!(1.0))],
            now(),
        );

        let trend = report.for_days(30).unwrap();
        assert_eq!(trend.overall_change, OverallChange::Increase);
        assert_eq!(trend.notable_changes, balances(&[("ETH", dec!(1.0))]));
        assert_eq!(
            trend.transaction_patterns,
            TransactionPatterns { send_count: 0, receive_count: 1, net_activity: 1 }
        );
    }

    #[test]
    fn test_scenario_empty_history() {
        let report = TrendEngine::default().analyze(&balances(&[("BTC", dec!(0.7)), ("ETH", dec!(2))]), &[], now());

        assert_eq!(report.len(), 3);
        for (_, trend) in report.iter() {
            assert_eq!(*trend, TrendResult::stable());
        }
    }

    #[test]
    fn test_scenario_send_only_inside_longest_window() {
        let current = balances(&[("USDT", dec!(100))]);
        let history = [Transaction::send(days_ago(120), "USDT", dec!(50))];
        let report = TrendEngine::default().analyze(&current, &history, now());

        for days in [30, 90] {
            let trend = report.for_days(days).unwrap();
            assert_eq!(trend.overall_change, OverallChange::Stable);
            assert!(trend.notable_changes.is_empty());
        }

        let trend = report.for_days(180).unwrap();
        assert_eq!(trend.overall_change, OverallChange::Decrease);
        assert_eq!(trend.notable_changes["USDT"], dec!(-50));
        assert_eq!(trend.transaction_patterns.send_count, 1);
    }

    #[test]
    fn test_activity_older_than_every_window_is_ignored() {
        let current = balances(&[("USDT", dec!(100))]);
        let history = [Transaction::send(days_ago(200), "USDT", dec!(50))];
        let report = TrendEngine::default().analyze(&current, &history, now());

        for (_, trend) in report.iter() {
            assert_eq!(*trend, TrendResult::stable());
        }
    }

    #[test]
    fn test_idempotent() {
        let engine = TrendEngine::default();
        let current = balances(&[("ETH", dec!(4)), ("USDT", dec!(800))]);
        let history = mixed_history();

        let first = serde_json::to_string(&engine.analyze(&current, &history, now())).unwrap();
        let second = serde_json::to_string(&engine.analyze(&current, &history, now())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_short_window_ignores_older_activity() {
        let engine = TrendEngine::default();
        let current = balances(&[("ETH", dec!(4)), ("USDT", dec!(800))]);
        let mut history = mixed_history();
        let baseline = engine.analyze(&current, &history, now());

        // only touch activity between 30 and 180 days back
        history.push(Transaction::receive(days_ago(170), "DOGE", dec!(1000000)));
        history[2].amount = dec!(7);
        let altered = engine.analyze(&current, &history, now());

        assert_eq!(baseline.for_days(30), altered.for_days(30));
        assert_ne!(baseline.for_days(180), altered.for_days(180));
    }

    #[test]
    fn test_invariants_hold_for_every_window() {
        let current = balances(&[("ETH", dec!(4)), ("USDT", dec!(800))]);
        let history = mixed_history();
        let report = TrendEngine::default().analyze(&current, &history, now());

        for (window, trend) in report.iter() {
            let filtered = filter_window(&history, window, now());
            let patterns = trend.transaction_patterns;
            assert_eq!(patterns.total() as usize, filtered.len());
            assert_eq!(
                patterns.net_activity,
                patterns.receive_count as i64 - patterns.send_count as i64
            );
            assert!(trend.notable_changes.values().all(|d| !d.is_zero()));

            let delta: Decimal = trend.notable_changes.values().copied().sum();
            assert_eq!(trend.overall_change, OverallChange::from_delta(delta));
        }
    }

    #[test]
    fn test_missing_symbol_does_not_abort() {
        let current = balances(&[("ETH", dec!(1))]);
        let history = [
            Transaction::receive(days_ago(20), "SHIB", dec!(5000)),
            Transaction::send(days_ago(10), "SHIB", dec!(5000)),
            Transaction::receive(days_ago(5), "ETH", dec!(0.5)),
        ];
        let report = TrendEngine::default().analyze(&current, &history, now());

        let trend = report.for_days(30).unwrap();
        assert_eq!(trend.overall_change, OverallChange::Increase);
        assert_eq!(trend.notable_changes, balances(&[("ETH", dec!(0.5))]));
        assert_eq!(trend.transaction_patterns.total(), 3);
    }

    #[test]
    fn test_extreme_balances_do_not_abort_any_window() {
        let current = balances(&[("ETH", Decimal::MAX), ("DEBT", Decimal::MIN)]);
        let history = [
            Transaction::send(days_ago(1), "ETH", dec!(1)),
            Transaction::receive(days_ago(2), "DEBT", dec!(1)),
        ];
        let report = TrendEngine::default().analyze(&current, &history, now());

        assert_eq!(report.len(), 3);
        for (_, trend) in report.iter() {
            assert_eq!(trend.transaction_patterns.total(), 2);
            assert!(trend.notable_changes.values().all(|d| !d.is_zero()));
        }
    }

    #[test]
    fn test_custom_windows_sorted_and_deduplicated() {
        let engine = TrendEngine::with_days(&[365, 7, 30, 7]).unwrap();
        let days: Vec<u32> = engine.windows().iter().map(|w| w.as_days()).collect();
        assert_eq!(days, vec![7, 30, 365]);

        assert!(TrendEngine::with_days(&[]).is_err());
        assert!(TrendEngine::with_days(&[0]).is_err());
        assert!(TrendEngine::with_days(&[30, 4_000_000_000]).is_err());
    }

    #[test]
    fn test_report_serializes_keyed_by_window() {
        let report = TrendEngine::default().analyze(&balances(&[("ETH", dec!(1))]), &[], now());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["30"]["overall_change"], "stable");
        assert_eq!(json["180"]["transaction_patterns"]["net_activity"], 0);
    }
}
