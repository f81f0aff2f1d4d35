//! Window filtering and balance reconstruction

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use super::Window;
use crate::model::{BalanceMap, Transaction, TransactionKind};

/// Unix timestamp of `now - window`, clamped to the earliest representable instant
pub fn window_cutoff(now: DateTime<Utc>, window: Window) -> i64 {
    Duration::try_days(i64::from(window.as_days()))
        .and_then(|span| now.checked_sub_signed(span))
        .map_or(i64::MIN, |start| start.timestamp())
}

/// Transactions with `now - window <= timestamp < now`, in input order
pub fn filter_window<'a>(
    history: &'a [Transaction],
    window: Window,
    now: DateTime<Utc>,
) -> Vec<&'a Transaction> {
    let start = window_cutoff(now, window);
    let end = now.timestamp();
    history
        .iter()
        .filter(|tx| tx.timestamp >= start && tx.timestamp < end)
        .collect()
}

/// Balances as of the start of the window.
///
/// Folds the in-window transactions backwards over the current balances:
/// a receive is taken back out, a send is put back in. A token with no
/// current balance starts from zero. Arithmetic saturates at `Decimal`'s
/// bounds, which records within [`MAX_QUANTITY`] never reach.
///
/// [`MAX_QUANTITY`]: crate::model::MAX_QUANTITY
pub fn reconstruct_initial_balances<'a, I>(current: &BalanceMap, in_window: I) -> BalanceMap
where
    I: IntoIterator<Item = &'a Transaction>,
{
    in_window.into_iter().fold(current.clone(), |mut balances, tx| {
        let entry = balances.entry(tx.token.clone()).or_insert(Decimal::ZERO);
        match tx.kind {
            TransactionKind::Receive => *entry = entry.saturating_sub(tx.amount),
            TransactionKind::Send => *entry = entry.saturating_add(tx.amount),
        }
        balances
    })
}

/// Tokens referenced by the transactions that have no current balance entry
pub fn missing_baselines<'a, I>(current: &BalanceMap, txs: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    txs.into_iter()
        .filter(|tx| !current.contains_key(&tx.token))
        .map(|tx| tx.token.clone())
        .collect()
}
