//! Security report derived from a snapshot.
//!
//! Rates are rendered as strings with two decimals (`"36.36"`), matching what
//! the report endpoint has always returned.

use serde::Serialize;

use super::snapshot::MetricsSnapshot;

/// Suspicious requests below this keep the status at `SECURE`.
const ALERT_SUSPICIOUS_REQUESTS: u64 = 10;
const HIGH_SUSPICIOUS_REQUESTS: u64 = 10;
const MEDIUM_UNAUTHORIZED: u64 = 20;
const LOW_RATE_LIMITED: u64 = 50;
const BRUTE_FORCE_MIN_ATTEMPTS: u64 = 10;
const BRUTE_FORCE_MAX_SUCCESS_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatStatus {
    Secure,
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    High,
    Medium,
    Low,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub message: &'static str,
}

impl Recommendation {
    const fn new(severity: Severity, message: &'static str) -> Self {
        Self { severity, message }
    }
}

pub const ELEVATED_SUSPICIOUS_ACTIVITY: Recommendation = Recommendation::new(
    Severity::High,
    "Elevated suspicious activity detected. Review security logs.",
);
pub const REPEATED_UNAUTHORIZED: Recommendation = Recommendation::new(
    Severity::Medium,
    "Multiple unauthorized access attempts. Consider IP blocking.",
);
pub const FREQUENT_RATE_LIMITING: Recommendation = Recommendation::new(
    Severity::Low,
    "Rate limiting frequently triggered. Consider adjusting limits.",
);
pub const POSSIBLE_BRUTE_FORCE: Recommendation = Recommendation::new(
    Severity::Medium,
    "Low login success rate. Possible brute force attempts.",
);
pub const ALL_NORMAL: Recommendation = Recommendation::new(
    Severity::Info,
    "All security metrics within normal parameters.",
);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub status: ThreatStatus,
    /// Hours, two decimals.
    pub uptime: String,
    pub total_requests: u64,
    pub success_rate: String,
    /// Milliseconds, two decimals.
    pub avg_response_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSecurity {
    pub login_success_rate: String,
    pub suspicious_requests: u64,
    pub suspicious_ips: usize,
    pub unauthorized_attempts: u64,
    pub rate_limit_hits: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityReport {
    pub summary: ReportSummary,
    pub security: ReportSecurity,
    pub recommendations: Vec<Recommendation>,
}

impl SecurityReport {
    pub fn from_snapshot(s: &MetricsSnapshot) -> Self {
        let req = &s.requests;
        let sec = &s.security;

        let status = if sec.suspicious_requests < ALERT_SUSPICIOUS_REQUESTS {
            ThreatStatus::Secure
        } else {
            ThreatStatus::Alert
        };

        Self {
            summary: ReportSummary {
                status,
                uptime: s.format_uptime_hours(),
                total_requests: req.total,
                success_rate: percent(req.successful, req.total),
                avg_response_time: format!("{:.2}", s.performance.average_response_time_ms),
            },
            security: ReportSecurity {
                login_success_rate: percent(sec.login_successes, sec.login_attempts),
                suspicious_requests: sec.suspicious_requests,
                suspicious_ips: sec.suspicious_ip_count(),
                unauthorized_attempts: req.unauthorized,
                rate_limit_hits: req.rate_limited,
            },
            recommendations: recommendations(s),
        }
    }
}

/// `part / whole * 100` with two decimals; `"0.00"` when `whole` is zero.
fn percent(part: u64, whole: u64) -> String {
    if whole == 0 {
        return format!("{:.2}", 0.0);
    }
    format!("{:.2}", part as f64 / whole as f64 * 100.0)
}

/// Evaluated in a fixed order; never empty.
fn recommendations(s: &MetricsSnapshot) -> Vec<Recommendation> {
    let req = &s.requests;
    let sec = &s.security;
    let mut out = Vec::new();

    if sec.suspicious_requests > HIGH_SUSPICIOUS_REQUESTS {
        out.push(ELEVATED_SUSPICIOUS_ACTIVITY);
    }
    if req.unauthorized > MEDIUM_UNAUTHORIZED {
        out.push(REPEATED_UNAUTHORIZED);
    }
    if req.rate_limited > LOW_RATE_LIMITED {
        out.push(FREQUENT_RATE_LIMITING);
    }
    if sec.login_attempts > BRUTE_FORCE_MIN_ATTEMPTS {
        let ratio = sec.login_successes as f64 / sec.login_attempts as f64;
        if ratio < BRUTE_FORCE_MAX_SUCCESS_RATIO {
            out.push(POSSIBLE_BRUTE_FORCE);
        }
    }

    if out.is_empty() {
        out.push(ALL_NORMAL);
    }
    out
}
