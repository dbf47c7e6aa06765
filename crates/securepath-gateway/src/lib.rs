//! SecurePath gateway library entry.
//!
//! This crate wires config, traffic policy, request tracking, and the
//! monitoring endpoints around a `securepath_core::MetricsAggregator`. It is
//! consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod context;
pub mod error;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
pub mod transport;
