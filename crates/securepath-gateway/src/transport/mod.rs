//! HTTP transport layer.
//!
//! Axum middleware sitting between the listener and the handlers: rate
//! limiting first, then request tracking wrapped around everything so that
//! rejected requests are counted too.

pub mod middleware;

pub use middleware::{enforce_rate_limit, track_request};
