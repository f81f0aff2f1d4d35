//! Send/receive activity counts

use serde::{Deserialize, Serialize};

use crate::model::{Transaction, TransactionKind};

/// Activity inside one window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPatterns {
    pub send_count: u64,
    pub receive_count: u64,
    /// `receive_count - send_count`; positive means net inflow
    pub net_activity: i64,
}

impl TransactionPatterns {
    pub fn from_transactions<'a, I>(txs: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let (send_count, receive_count) = txs.into_iter().fold((0u64, 0u64), |(s, r), tx| match tx.kind {
            TransactionKind::Send => (s + 1, r),
            TransactionKind::Receive => (s, r + 1),
        });

        Self {
            send_count,
            receive_count,
            net_activity: i64::try_from(receive_count).unwrap_or(i64::MAX)
                - i64::try_from(send_count).unwrap_or(i64::MAX),
        }
    }

    pub fn total(&self) -> u64 {
        self.send_count + self.receive_count
    }

    pub fn net_flow(&self) -> &'static str {
        match self.net_activity {
            n if n > 0 => "net receiving",
            n if n < 0 => "net sending",
            _ => "balanced",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_counts_and_net() {
        let txs = vec![
            Transaction::send(1, "ETH", dec!(1)),
            Transaction::receive(2, "ETH", dec!(1)),
            Transaction::receive(3, "USDT", dec!(10)),
        ];
        let patterns = TransactionPatterns::from_transactions(&txs);
        assert_eq!(patterns.send_count, 1);
        assert_eq!(patterns.receive_count, 2);
        assert_eq!(patterns.net_activity, 1);
        assert_eq!(patterns.total(), 3);
        assert_eq!(patterns.net_flow(), "net receiving");
    }

    #[test]
    fn test_empty_is_balanced() {
        let patterns = TransactionPatterns::from_transactions(std::iter::empty());
        assert_eq!(patterns, TransactionPatterns::default());
        assert_eq!(patterns.net_flow(), "balanced");
    }
}
