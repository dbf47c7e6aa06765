//! Request and security counters.
//!
//! One `MetricsAggregator` is built at startup and shared by `Arc` with every
//! collaborator that records events or reads reports. All counter updates for a
//! single call happen inside one critical section, so concurrent recorders never
//! lose an increment and the running average stays consistent with `total`.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use super::event::{AutoBlock, SecurityEvent, AUTO_BLOCK_THRESHOLD};
use super::probe::{ProcessProbe, SysinfoProbe};
use super::report::SecurityReport;
use super::snapshot::{MetricsSnapshot, PerformanceStats, RequestCounters, SecurityCounters};

#[derive(Debug, Default)]
struct Counters {
    requests: RequestCounters,
    security: SecurityCounters,
    average_response_time_ms: f64,
}

pub struct MetricsAggregator {
    counters: Mutex<Counters>,
    started: Instant,
    started_at: DateTime<Utc>,
    probe: Box<dyn ProcessProbe>,
}

impl MetricsAggregator {
    /// Aggregator sampling process memory through `sysinfo`.
    pub fn new() -> Self {
        Self::with_probe(Box::new(SysinfoProbe::new()))
    }

    pub fn with_probe(probe: Box<dyn ProcessProbe>) -> Self {
        Self {
            counters: Mutex::new(Counters::default()),
            started: Instant::now(),
            started_at: Utc::now(),
            probe,
        }
    }

    // Counters are plain integers, consistent after every critical section,
    // so a poisoned lock is still safe to read and update.
    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one completed HTTP response.
    ///
    /// 2xx counts as successful and >= 400 as failed (401/403 additionally as
    /// unauthorized, 429 as rate limited). Any other code only bumps `total`.
    pub fn record_request(&self, status: u16, response_time_ms: f64) {
        let mut c = self.lock();
        let req = &mut c.requests;

        req.total += 1;
        if (200..300).contains(&status) {
            req.successful += 1;
        } else if status >= 400 {
            req.failed += 1;
            match status {
                401 | 403 => req.unauthorized += 1,
                429 => req.rate_limited += 1,
                _ => {}
            }
        }

        let n = req.total as f64;
        c.average_response_time_ms = (c.average_response_time_ms * (n - 1.0) + response_time_ms) / n;
    }

    /// Record a security event. Returns the auto-block signal when a
    /// suspicious IP reaches the threshold; the signal is also logged.
    pub fn record_security_event(&self, event: SecurityEvent) -> Option<AutoBlock> {
        let kind = event.kind();
        let signal = {
            let mut c = self.lock();
            let sec = &mut c.security;
            match event {
                SecurityEvent::LoginAttempt { success } => {
                    sec.login_attempts += 1;
                    if success {
                        sec.login_successes += 1;
                    }
                    None
                }
                SecurityEvent::SuspiciousRequest { ip } => {
                    sec.suspicious_requests += 1;
                    ip.and_then(|ip| {
                        let hits = sec.suspicious_ips.entry(ip.clone()).or_insert(0);
                        *hits += 1;
                        (*hits >= AUTO_BLOCK_THRESHOLD).then(|| AutoBlock { ip, hits: *hits })
                    })
                }
            }
        };

        if let Some(block) = &signal {
            tracing::error!(
                event = kind.as_str(),
                ip = %block.ip,
                hits = block.hits,
                "auto-blocking IP due to suspicious activity (log only, not enforced)"
            );
        }
        signal
    }

    /// Copy of the counters plus uptime, memory, and a timestamp.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let (requests, security, average_response_time_ms) = {
            let c = self.lock();
            (c.requests.clone(), c.security.clone(), c.average_response_time_ms)
        };

        MetricsSnapshot {
            requests,
            security,
            performance: PerformanceStats {
                average_response_time_ms,
                process_start_time: self.started_at,
                uptime_secs: self.uptime().as_secs_f64(),
                memory: self.probe.memory(),
                timestamp: Utc::now(),
            },
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn generate_report(&self) -> SecurityReport {
        SecurityReport::from_snapshot(&self.snapshot())
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}
