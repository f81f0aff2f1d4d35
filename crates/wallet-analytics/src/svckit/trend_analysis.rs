//! Historical Trend Analysis Service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::narrative::interpret_strategy;
use crate::report::{render_trend_report, ReportArtifact};
use crate::source::WalletRecordSource;
use crate::trend::{TrendEngine, TrendReport};

/// Trend results for one wallet together with their prose reading
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub wallet_address: String,
    pub generated_at: DateTime<Utc>,
    pub trends: TrendReport,
    pub conclusion: String,
}

impl TrendAnalysis {
    pub fn render(&self) -> String {
        render_trend_report(&self.wallet_address, &self.trends, self.generated_at)
    }

    pub fn artifact(&self) -> ReportArtifact {
        ReportArtifact::new("trend_report", &self.wallet_address, self.generated_at, "txt", self.render())
    }
}

pub struct TrendAnalysisService {
    source: Arc<dyn WalletRecordSource>,
    engine: TrendEngine,
}

impl TrendAnalysisService {
    pub fn new(source: Arc<dyn WalletRecordSource>, engine: TrendEngine) -> Self {
        Self { source, engine }
    }

    pub fn engine(&self) -> &TrendEngine {
        &self.engine
    }

    /// Analyze the wallet as of `now`. A missing record is returned as
    /// `MissingWalletRecord` for the caller to skip or abort on.
    ///
    /// Records are validated here too; not every source checks on write.
    pub async fn analyze(&self, wallet_address: &str, now: DateTime<Utc>) -> Result<TrendAnalysis> {
        let record = self.source.require(wallet_address).await?;
        record.validate()?;

        tracing::info!(
            wallet = %wallet_address,
            source = self.source.name(),
            transactions = record.transaction_history.len(),
            balances = record.token_balances.len(),
            "starting historical trend analysis"
        );

        let trends = self.engine.analyze_record(&record, now);
        let conclusion = interpret_strategy(&trends);

        Ok(TrendAnalysis {
            wallet_address: record.wallet_address,
            generated_at: now,
            trends,
            conclusion,
        })
    }
}
