//! HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use wallet_analytics::{
    source::Upsert, AnalyticsError, TrendAnalysis, WalletAgeReport, WalletRecord,
};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub wallets: usize,
    pub trend_windows: Vec<u32>,
    pub provider_configured: bool,
    pub provider_connected: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct UpsertResponse {
    pub wallet_address: String,
    pub created: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub wallet_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_age: Option<WalletAgeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_age_error: Option<String>,
    pub trends: TrendAnalysis,
    pub reports: Vec<String>,
}

/// Analytics failure rendered as an HTTP error
pub struct ApiError(AnalyticsError);

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            AnalyticsError::MissingWalletRecord(_) => (StatusCode::NOT_FOUND, "WALLET_NOT_FOUND"),
            AnalyticsError::InvalidRecord { .. } => (StatusCode::BAD_REQUEST, "INVALID_RECORD"),
            AnalyticsError::InvalidWindow(_) => (StatusCode::BAD_REQUEST, "INVALID_WINDOW"),
            AnalyticsError::UnknownWalletAge(_) => (StatusCode::UNPROCESSABLE_ENTITY, "UNKNOWN_WALLET_AGE"),
            AnalyticsError::Report(_) => (StatusCode::CONFLICT, "REPORT_EXISTS"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        } else if self.0.is_data_error() {
            tracing::warn!(code, "rejected wallet data: {}", self.0);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                code: code.into(),
            }),
        )
            .into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = match &state.provider {
        Some(provider) => provider.health_check().await.unwrap_or(false),
        None => false,
    };

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        wallets: state.store.len().await,
        trend_windows: state.trends.engine().windows().iter().map(|w| w.as_days()).collect(),
        provider_configured: state.provider.is_some(),
        provider_connected,
    })
}

/// Insert or replace a wallet record
pub async fn upsert_wallet(
    State(state): State<AppState>,
    Json(record): Json<WalletRecord>,
) -> Result<(StatusCode, Json<UpsertResponse>), ApiError> {
    let wallet_address = record.wallet_address.clone();
    let outcome = state.store.upsert(record).await?;

    let status = match outcome {
        Upsert::Inserted => StatusCode::CREATED,
        Upsert::Updated => StatusCode::OK,
    };
    Ok((
        status,
        Json(UpsertResponse {
            wallet_address,
            created: outcome == Upsert::Inserted,
        }),
    ))
}

/// Trend analysis without writing a report
pub async fn wallet_trends(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<TrendAnalysis>, ApiError> {
    Ok(Json(state.trends.analyze(&address, Utc::now()).await?))
}

/// Wallet-age classification without writing a report
pub async fn wallet_age(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<WalletAgeReport>, ApiError> {
    Ok(Json(state.ages.analyze(&address, Utc::now()).await?))
}

/// Full run: wallet age first, then trends. Reports are written only
/// once both analyses are done, so a failure leaves no partial output.
///
/// A wallet whose age cannot be determined still gets its trend report.
pub async fn analyze_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let now = Utc::now();

    tracing::info!(wallet = %address, "start wallet age analysis");
    let (wallet_age, wallet_age_error) = match state.ages.analyze(&address, now).await {
        Ok(report) => (Some(report), None),
        Err(err @ AnalyticsError::UnknownWalletAge(_)) => {
            tracing::warn!(wallet = %address, "{}", err);
            (None, Some(err.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(wallet = %address, "start historical trend analysis");
    let trends = state.trends.analyze(&address, now).await?;

    let mut artifacts = Vec::with_capacity(2);
    if let Some(report) = &wallet_age {
        artifacts.push(report.artifact(&address, now)?);
    }
    artifacts.push(trends.artifact());

    let reports = state.sink.write_all(&artifacts).await?;
    tracing::info!(wallet = %address, sink = state.sink.name(), count = reports.len(), "reports stored");

    Ok(Json(AnalyzeResponse {
        wallet_address: address,
        wallet_age,
        wallet_age_error,
        trends,
        reports,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
        Router,
    };
    use chrono::Duration;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use wallet_analytics::{
        MemoryReportSink, MemoryWalletStore, TrendAnalysisService, TrendEngine, WalletAgeService,
    };

    use super::*;
    use crate::build_router;

    fn record_json() -> Value {
        let ten_days_ago = (Utc::now() - Duration::days(10)).timestamp();
        json!({
            "wallet_address": "0xAAA",
            "token_balances": [{"symbol": "ETH", "balance": 3.0}],
            "transaction_history": [
                {"timestamp": ten_days_ago, "token": "ETH", "amount": 1.0, "type": "receive"}
            ]
        })
    }

    fn app_with_sink() -> (Router, Arc<MemoryReportSink>) {
        let record: WalletRecord = serde_json::from_value(record_json()).unwrap();
        let bare: WalletRecord = serde_json::from_value(json!({"wallet_address": "0xBARE"})).unwrap();
        let store = Arc::new(MemoryWalletStore::with_records([record, bare]).unwrap());
        let sink = Arc::new(MemoryReportSink::new());

        let state = AppState::new(
            store.clone(),
            TrendAnalysisService::new(store.clone(), TrendEngine::default()),
            WalletAgeService::new(store.clone(), None),
            sink.clone(),
            None,
        );
        (build_router(state), sink)
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app_with_sink();
        let (status, body) = send(app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wallets"], 2);
        assert_eq!(body["trend_windows"], json!([30, 90, 180]));
        assert_eq!(body["provider_configured"], false);
    }

    #[tokio::test]
    async fn test_trends_for_known_wallet() {
        let (app, _) = app_with_sink();
        let (status, body) = send(app, Method::GET, "/api/wallets/0xAAA/trends", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["trends"]["30"]["overall_change"], "increase");
        assert_eq!(body["trends"]["30"]["transaction_patterns"]["receive_count"], 1);
    }

    #[tokio::test]
    async fn test_unknown_wallet_is_404() {
        let (app, _) = app_with_sink();
        let (status, body) = send(app, Method::GET, "/api/wallets/0xNOPE/trends", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "WALLET_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_upsert_then_update() {
        let (app, _) = app_with_sink();
        let mut record = record_json();
        record["wallet_address"] = json!("0xNEW");

        let (status, body) = send(app.clone(), Method::PUT, "/api/wallets", Some(record.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["created"], true);

        let (status, _) = send(app, Method::PUT, "/api/wallets", Some(record)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_record_rejected() {
        let (app, _) = app_with_sink();
        let record = json!({
            "wallet_address": "0xBAD",
            "token_balances": [{"symbol": "ETH", "balance": 1}, {"symbol": "ETH", "balance": 2}]
        });
        let (status, body) = send(app, Method::PUT, "/api/wallets", Some(record)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_RECORD");
    }

    #[tokio::test]
    async fn test_analyze_writes_both_reports() {
        let (app, sink) = app_with_sink();
        let (status, body) = send(app, Method::POST, "/api/wallets/0xAAA/analyze", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wallet_age"]["Category"], "Newcomer");
        assert_eq!(body["reports"].as_array().unwrap().len(), 2);

        let names = sink.names().await;
        assert!(names.iter().any(|n| n.contains("_wallet_age_")));
        assert!(names.iter().any(|n| n.contains("_trend_report_")));
    }

    #[tokio::test]
    async fn test_failed_trend_run_writes_no_age_report() {
        let record: WalletRecord = serde_json::from_value(record_json()).unwrap();
        let with_wallet = Arc::new(MemoryWalletStore::with_records([record]).unwrap());
        let without_wallet = Arc::new(MemoryWalletStore::default());
        let sink = Arc::new(MemoryReportSink::new());

        let state = AppState::new(
            with_wallet.clone(),
            TrendAnalysisService::new(without_wallet, TrendEngine::default()),
            WalletAgeService::new(with_wallet, None),
            sink.clone(),
            None,
        );

        let (status, body) = send(build_router(state), Method::POST, "/api/wallets/0xAAA/analyze", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "WALLET_NOT_FOUND");
        assert!(sink.names().await.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_without_age_still_reports_trends() {
        let (app, sink) = app_with_sink();
        let (status, body) = send(app, Method::POST, "/api/wallets/0xBARE/analyze", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("wallet_age").is_none());
        assert!(body["wallet_age_error"].as_str().unwrap().contains("0xBARE"));
        assert_eq!(sink.names().await.len(), 1);
    }
}
