//! Strategy interpretation
//!
//! Restates a [`TrendReport`] in prose. No new numbers are computed here.

use rust_decimal::Decimal;

use crate::model::BalanceMap;
use crate::trend::{OverallChange, TrendReport, TrendResult, Window};

/// One sentence per window, shortest window first
pub fn interpret_strategy(report: &TrendReport) -> String {
    report
        .iter()
        .map(|(window, trend)| describe_window(window, trend))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sentence for a single window
pub fn describe_window(window: Window, trend: &TrendResult) -> String {
    let reading = match trend.overall_change {
        OverallChange::Increase => "increased, suggesting active investment or accumulation",
        OverallChange::Decrease => "decreased, indicating divestment or profit-taking",
        OverallChange::Stable => "remained stable, suggesting a holding strategy",
    };

    let mut sentence = format!("Over the {window} period the portfolio value has {reading}");

    if !trend.notable_changes.is_empty() {
        sentence.push_str(&format!(
            ", with notable changes in {}",
            format_changes(&trend.notable_changes, ", ")
        ));
    }

    let patterns = &trend.transaction_patterns;
    sentence.push_str(&format!(
        ", and the wallet was {} ({} received, {} sent).",
        patterns.net_flow(),
        patterns.receive_count,
        patterns.send_count
    ));
    sentence
}

/// `SYMBOL: delta` pairs, deltas signed and without trailing zeros
pub fn format_changes(changes: &BalanceMap, separator: &str) -> String {
    changes
        .iter()
        .map(|(symbol, delta)| format!("{symbol}: {}", signed(*delta)))
        .collect::<Vec<_>>()
        .join(separator)
}

fn signed(delta: Decimal) -> String {
    let delta = delta.normalize();
    if delta > Decimal::ZERO {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}
