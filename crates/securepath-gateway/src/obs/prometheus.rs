//! Prometheus text exposition of a metrics snapshot.
//!
//! Rendered on demand from `MetricsAggregator::snapshot()`; there is no
//! separate registry. Response times are exported in milliseconds.

use std::fmt::Write;

use securepath_core::monitor::MetricsSnapshot;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn counter(out: &mut String, name: &str, v: u64) {
    let _ = writeln!(out, "# TYPE {} counter", name);
    let _ = writeln!(out, "{} {}", name, v);
}

fn gauge(out: &mut String, name: &str, v: impl std::fmt::Display) {
    let _ = writeln!(out, "# TYPE {} gauge", name);
    let _ = writeln!(out, "{} {}", name, v);
}

pub fn render(s: &MetricsSnapshot) -> String {
    let mut out = String::new();
    let req = &s.requests;
    let sec = &s.security;
    let perf = &s.performance;

    counter(&mut out, "securepath_requests_total", req.total);
    counter(&mut out, "securepath_requests_successful_total", req.successful);
    counter(&mut out, "securepath_requests_failed_total", req.failed);
    counter(&mut out, "securepath_requests_unauthorized_total", req.unauthorized);
    counter(&mut out, "securepath_requests_rate_limited_total", req.rate_limited);

    counter(&mut out, "securepath_login_attempts_total", sec.login_attempts);
    counter(&mut out, "securepath_login_successes_total", sec.login_successes);
    counter(&mut out, "securepath_suspicious_requests_total", sec.suspicious_requests);

    let _ = writeln!(out, "# TYPE securepath_suspicious_ip_hits_total counter");
    for (ip, hits) in &sec.suspicious_ips {
        let _ = writeln!(out, "securepath_suspicious_ip_hits_total{{ip=\"{}\"}} {}", escape_label(ip), hits);
    }

    gauge(&mut out, "securepath_response_time_avg_ms", perf.average_response_time_ms);
    gauge(&mut out, "securepath_uptime_seconds", perf.uptime_secs);
    gauge(&mut out, "securepath_memory_resident_bytes", perf.memory.resident_bytes);
    gauge(&mut out, "securepath_memory_virtual_bytes", perf.memory.virtual_bytes);
    out
}
