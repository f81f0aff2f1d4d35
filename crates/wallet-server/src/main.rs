//! Wallet Analytics HTTP Server
//!
//! Axum-based server exposing wallet-age classification and historical
//! trend analysis over the wallet records handed to it by ingestion.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{routing::{get, post, put}, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::LlmProvider;
use agent_runtime::OpenAiCompatProvider;
use wallet_analytics::{
    FileReportSink, MemoryWalletStore, ReportSink, TrendAnalysisService, TrendEngine, WalletAgeService,
};

use crate::config::ServerConfig;
use crate::handlers::{analyze_wallet, health_check, upsert_wallet, wallet_age, wallet_trends};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/wallets", put(upsert_wallet))
        .route("/api/wallets/{address}/trends", get(wallet_trends))
        .route("/api/wallets/{address}/age", get(wallet_age))
        .route("/api/wallets/{address}/analyze", post(analyze_wallet))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment before reading RUST_LOG
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Text-generation provider is optional
    let provider: Option<Arc<dyn LlmProvider>> = match &config.llm {
        Some(llm) => {
            let provider = OpenAiCompatProvider::new(llm.clone())?;
            if provider.health_check().await.unwrap_or(false) {
                tracing::info!(url = %llm.base_url, "text-generation provider reachable");
            } else {
                tracing::warn!(url = %llm.base_url, "text-generation provider not reachable; wallet age analysis will use fallback text");
            }
            Some(Arc::new(provider))
        }
        None => {
            tracing::warn!("LLM_BASE_URL not set - wallet age analysis uses fallback text");
            None
        }
    };

    let store = Arc::new(MemoryWalletStore::from_json_file(&config.wallet_data_path).await?);
    let engine = TrendEngine::with_days(&config.trend_windows)?;
    let sink: Arc<dyn ReportSink> = Arc::new(FileReportSink::new(&config.report_dir));

    let state = AppState::new(
        store.clone(),
        TrendAnalysisService::new(store.clone(), engine),
        WalletAgeService::new(store.clone(), provider.clone()).with_options(config.generation.clone()),
        sink,
        provider,
    );

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("wallet-server listening on http://{}", config.bind_addr);
    tracing::info!(
        wallets = store.len().await,
        windows = ?config.trend_windows,
        reports = %config.report_dir.display(),
        "ready"
    );
    tracing::info!("  GET  /health");
    tracing::info!("  PUT  /api/wallets");
    tracing::info!("  GET  /api/wallets/{{address}}/trends");
    tracing::info!("  GET  /api/wallets/{{address}}/age");
    tracing::info!("  POST /api/wallets/{{address}}/analyze");

    axum::serve(listener, app).await?;

    Ok(())
}
