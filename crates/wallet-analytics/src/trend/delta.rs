//! Balance deltas and their classification

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::BalanceMap;

/// Direction of the aggregate change over a window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallChange {
    Increase,
    Decrease,
    Stable,
}

impl OverallChange {
    /// Exact sign; only a delta of exactly zero is stable
    pub fn from_delta(delta: Decimal) -> Self {
        if delta > Decimal::ZERO {
            OverallChange::Increase
        } else if delta < Decimal::ZERO {
            OverallChange::Decrease
        } else {
            OverallChange::Stable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OverallChange::Increase => "increase",
            OverallChange::Decrease => "decrease",
            OverallChange::Stable => "stable",
        }
    }
}

impl std::fmt::Display for OverallChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sum of current quantities minus sum of initial quantities.
///
/// Raw token units across all assets; no prices are involved.
pub fn portfolio_value_change(initial: &BalanceMap, current: &BalanceMap) -> Decimal {
    total(current).saturating_sub(total(initial))
}

fn total(balances: &BalanceMap) -> Decimal {
    balances.values().fold(Decimal::ZERO, |acc, b| acc.saturating_add(*b))
}

/// Per-symbol `current - initial`, nonzero entries only
pub fn notable_changes(initial: &BalanceMap, current: &BalanceMap) -> BalanceMap {
    let symbols: BTreeSet<&String> = initial.keys().chain(current.keys()).collect();

    symbols
        .into_iter()
        .filter_map(|symbol| {
            let before = initial.get(symbol).copied().unwrap_or(Decimal::ZERO);
            let after = current.get(symbol).copied().unwrap_or(Decimal::ZERO);
            let change = after.saturating_sub(before);
            (!change.is_zero()).then(|| (symbol.clone(), change))
        })
        .collect()
}
