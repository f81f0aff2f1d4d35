//! Application State

use std::sync::Arc;

use agent_core::LlmProvider;
use wallet_analytics::{MemoryWalletStore, ReportSink, TrendAnalysisService, WalletAgeService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Wallet documents handed over by ingestion
    pub store: Arc<MemoryWalletStore>,

    pub trends: Arc<TrendAnalysisService>,

    pub ages: Arc<WalletAgeService>,

    /// Where report artifacts are written
    pub sink: Arc<dyn ReportSink>,

    /// Text-generation provider (optional - None if not configured)
    pub provider: Option<Arc<dyn LlmProvider>>,
}

impl AppState {
    pub fn new(
        store: Arc<MemoryWalletStore>,
        trends: TrendAnalysisService,
        ages: WalletAgeService,
        sink: Arc<dyn ReportSink>,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        Self {
            store,
            trends: Arc::new(trends),
            ages: Arc::new(ages),
            sink,
            provider,
        }
    }
}
