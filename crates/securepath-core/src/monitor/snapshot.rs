//! Point-in-time copy of the monitoring counters.
//!
//! Field names serialize in camelCase; this is the shape written to the daily
//! metrics files and read back by tooling.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request outcome counters.
///
/// `unauthorized` and `rate_limited` are sub-counts of `failed`. Status codes
/// outside 200-299 and below 400 only bump `total`, so `successful + failed`
/// can fall short of `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCounters {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub unauthorized: u64,
    pub rate_limited: u64,
}

/// Security event counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityCounters {
    pub login_attempts: u64,
    pub login_successes: u64,
    pub suspicious_requests: u64,
    /// Suspicious IP -> observed hits. The key set is the suspicious-IP set.
    pub suspicious_ips: BTreeMap<String, u64>,
}

impl SecurityCounters {
    pub fn suspicious_ip_count(&self) -> usize {
        self.suspicious_ips.len()
    }
}

/// Process memory as reported by the probe, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub resident_bytes: u64,
    pub virtual_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub average_response_time_ms: f64,
    pub process_start_time: DateTime<Utc>,
    pub uptime_secs: f64,
    pub memory: MemoryUsage,
    pub timestamp: DateTime<Utc>,
}

/// Read-only copy of all counters plus live process values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub requests: RequestCounters,
    pub security: SecurityCounters,
    pub performance: PerformanceStats,
}

impl MetricsSnapshot {
    /// Uptime in hours, two decimals.
    pub fn format_uptime_hours(&self) -> String {
        format!("{:.2}", self.performance.uptime_secs / 3600.0)
    }
}
