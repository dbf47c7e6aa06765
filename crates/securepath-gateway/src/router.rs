//! Axum router wiring.
//!
//! Layer order matters: `track_request` is outermost so responses produced by
//! the rate limiter (429) and the fallback (404) are counted like any other.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ops::root))
        .route("/health", get(ops::health))
        .route("/api/security-report", get(ops::security_report))
        .route("/metrics", get(ops::metrics))
        .fallback(ops::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), transport::enforce_rate_limit))
        .layer(middleware::from_fn_with_state(state.clone(), transport::track_request))
        .with_state(state)
}
