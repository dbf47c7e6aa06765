//! SecurePath core: the request metrics and security-monitoring engine.
//!
//! This crate owns the counters, snapshot types, report derivation, and the
//! per-day snapshot store. It carries no HTTP or async runtime dependencies so
//! the gateway, tests, and offline tooling can all drive it directly.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Monitoring is an observability sink: it must never take the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod monitor;

/// Shared result type.
pub use error::{Result, SecurePathError};
pub use monitor::{
    AutoBlock, MetricsAggregator, MetricsPersister, MetricsSnapshot, MetricsStore,
    SecurityEvent, SecurityReport,
};
