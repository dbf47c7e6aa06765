//! Per-request context shared across layers.
//!
//! Resolves who is calling (client IP) without coupling policy or monitoring
//! to axum extractor details.

pub mod client_ip;

pub use client_ip::client_ip;
