//! HTTP endpoints.
//!
//! - `/`                    : service banner
//! - `/health`              : liveness
//! - `/api/security-report` : derived security report (JSON)
//! - `/metrics`             : Prometheus text format
//! - fallback               : 404 JSON
//!
//! Snapshots sample process memory through a blocking `/proc` read, so the
//! report and metrics handlers take them on the blocking pool.

use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;

use securepath_core::monitor::MetricsAggregator;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::obs::prometheus;

pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": state.cfg().app.name,
        "status": "operational",
        "security": "enabled",
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.aggregator().uptime().as_secs_f64();
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": Utc::now().to_rfc3339(),
            "uptime": uptime,
        })),
    )
}

pub async fn security_report(State(state): State<AppState>) -> Result<Response, ApiError> {
    let report = with_aggregator(&state, MetricsAggregator::generate_report).await?;
    Ok(Json(report).into_response())
}

pub async fn metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = with_aggregator(&state, |agg| prometheus::render(&agg.snapshot())).await?;

    Ok((
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response())
}

async fn with_aggregator<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&MetricsAggregator) -> T + Send + 'static,
    T: Send + 'static,
{
    let aggregator = state.aggregator();
    tokio::task::spawn_blocking(move || f(&aggregator))
        .await
        .map_err(|e| ApiError::Internal(format!("snapshot task failed: {e}")))
}

pub async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound {
        path: uri.path().to_string(),
    }
}
