//! HTTP-facing errors.
//!
//! Monitoring failures never show up here; these are the responses the
//! gateway itself produces.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("too many requests")]
    RateLimited { retry_after_secs: u64 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let timestamp = Utc::now().to_rfc3339();
        match self {
            ApiError::NotFound { path } => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "Not Found",
                    "path": path,
                    "timestamp": timestamp,
                })),
            )
                .into_response(),
            ApiError::RateLimited { retry_after_secs } => {
                let secs = retry_after_secs.max(1);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [(header::RETRY_AFTER, secs.to_string())],
                    Json(json!({
                        "error": "Too many requests",
                        "retryAfter": secs,
                    })),
                )
                    .into_response()
            }
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal Server Error",
                        "timestamp": timestamp,
                    })),
                )
                    .into_response()
            }
        }
    }
}
