//! Request-path middleware: per-IP rate limiting and request tracking.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use securepath_core::monitor::SecurityEvent;

use crate::app_state::AppState;
use crate::context::client_ip;
use crate::error::ApiError;
use crate::policy::{classify, is_high_risk};

/// Reject requests from IPs that exhausted a bucket (general or path tier) with 429.
///
/// Requests without a resolvable client IP are let through.
pub async fn enforce_rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let limiter = state.rate_limiter();
    if limiter.enabled() {
        if let Some(ip) = client_ip(&req, state.cfg().app.trust_forwarded_for) {
            if let Err(retry_after_secs) = limiter.check(ip, req.uri().path()) {
                tracing::debug!(%ip, retry_after_secs, path = %req.uri().path(), "rate limit bucket empty");
                return ApiError::RateLimited { retry_after_secs }.into_response();
            }
        }
    }
    next.run(req).await
}

/// Feed every completed response into the aggregator and log it.
///
/// - every response: `record_request(status, elapsed_ms)`
/// - target matching a heuristic: suspicious-request event with the client IP
/// - `POST` to a login path: login attempt, successful when the response is 2xx
pub async fn track_request(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if !state.cfg().monitoring.enabled {
        return next.run(req).await;
    }

    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    let ip = client_ip(&req, state.cfg().app.trust_forwarded_for).map(|ip| ip.to_string());
    let peer = ip.as_deref().unwrap_or("unknown");
    let flag = classify(&target);

    if is_high_risk(&path) {
        tracing::info!(target: "security", event = "DATA_ACCESS", ip = peer, method = %method, path = %path, "high-risk resource accessed");
    }

    let response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    let aggregator = state.aggregator();
    aggregator.record_request(status.as_u16(), elapsed_ms);

    if let Some(flag) = flag {
        tracing::warn!(
            target: "security",
            event = "SUSPICIOUS_ACTIVITY",
            flag = flag.as_str(),
            ip = peer,
            method = %method,
            uri = %target,
            status = status.as_u16(),
            "suspicious request detected"
        );
        aggregator.record_security_event(SecurityEvent::SuspiciousRequest { ip: ip.clone() });
    }

    if method == Method::POST && state.is_login_path(&path) {
        let success = status.is_success();
        tracing::info!(target: "security", event = "LOGIN_ATTEMPT", ip = peer, success, "login attempt");
        aggregator.record_security_event(SecurityEvent::LoginAttempt { success });
    }

    log_response(&method, &target, status, elapsed_ms, peer);
    response
}

fn log_response(method: &Method, uri: &str, status: StatusCode, elapsed_ms: f64, ip: &str) {
    let code = status.as_u16();
    match code {
        401 | 403 => tracing::warn!(
            target: "security", event = "UNAUTHORIZED_ACCESS", ip, method = %method, uri, status = code, "unauthorized request"
        ),
        429 => tracing::warn!(
            target: "security", event = "RATE_LIMIT_EXCEEDED", ip, method = %method, uri, "rate limit exceeded"
        ),
        _ if status.is_server_error() => tracing::error!(
            ip, method = %method, uri, status = code, elapsed_ms, "server error"
        ),
        _ => tracing::info!(ip, method = %method, uri, status = code, elapsed_ms, "http request"),
    }
}
