//! Per-IP request rate limiter.
//!
//! Leaky bucket per client IP: `max_requests` capacity, refilled linearly so an
//! empty bucket is full again after `window_secs`. Rejections carry a
//! Retry-After hint in whole seconds (min 1). Each limiter tracks at most
//! `max_ip_entries` IPs.

use std::net::IpAddr;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use dashmap::DashMap;

use crate::config::RateLimitConfig;

/// Simple leaky bucket (capacity/refill, best-effort).
#[derive(Debug)]
pub struct LeakyBucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last: Instant,
}

impl LeakyBucket {
    pub fn new(capacity: u32, refill_per_sec: f64) -> Self {
        let cap = capacity.max(1) as f64;
        Self {
            capacity: cap,
            tokens: cap,
            refill_per_sec: refill_per_sec.max(f64::MIN_POSITIVE),
            last: Instant::now(),
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
    }

    /// Consume one token. Returns Err with retry-after seconds (ceil, min 1).
    pub fn try_take(&mut self) -> Result<(), u64> {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let wait = ((1.0 - self.tokens) / self.refill_per_sec).ceil();
            Err(wait.max(1.0) as u64)
        }
    }

    /// True once the bucket would be back at full capacity.
    fn is_idle(&self) -> bool {
        let elapsed = self.last.elapsed().as_secs_f64();
        self.tokens + elapsed * self.refill_per_sec >= self.capacity
    }
}

/// One bucket per client IP for a single limit.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    refill_per_sec: f64,
    max_ip_entries: usize,
    per_ip: DashMap<IpAddr, Mutex<LeakyBucket>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_secs: u64, max_ip_entries: usize) -> Self {
        Self {
            max_requests,
            refill_per_sec: max_requests as f64 / window_secs.max(1) as f64,
            max_ip_entries: max_ip_entries.max(1),
            per_ip: DashMap::new(),
        }
    }

    pub fn tracked_ips(&self) -> usize {
        self.per_ip.len()
    }

    /// Check one request from `ip`. On reject, returns retry-after seconds.
    /// Bucket locks are synchronous; never hold one across an await point.
    pub fn check(&self, ip: IpAddr) -> Result<(), u64> {
        {
            let entry = self
                .per_ip
                .entry(ip)
                .or_insert_with(|| Mutex::new(LeakyBucket::new(self.max_requests, self.refill_per_sec)));
            let mut bucket = entry.value().lock().unwrap_or_else(PoisonError::into_inner);
            bucket.try_take()?;
        }

        if self.per_ip.len() > self.max_ip_entries {
            self.trim();
        }

        Ok(())
    }

    /// Drop buckets that have refilled completely, then evict the least recently
    /// seen ones until the map is back under its low-water mark (90% of the cap).
    /// Buckets locked by an in-flight check are skipped.
    fn trim(&self) {
        let before = self.per_ip.len();
        self.per_ip
            .retain(|_, b| b.try_lock().map(|b| !b.is_idle()).unwrap_or(true));

        let low_water = self.max_ip_entries - self.max_ip_entries / 10;
        let excess = self.per_ip.len().saturating_sub(low_water);
        if excess > 0 {
            let mut by_age: Vec<(IpAddr, Instant)> = self
                .per_ip
                .iter()
                .filter_map(|e| e.value().try_lock().ok().map(|b| (*e.key(), b.last)))
                .collect();
            by_age.sort_unstable_by_key(|&(_, last)| last);
            for (ip, _) in by_age.into_iter().take(excess) {
                self.per_ip.remove(&ip);
            }
        }

        tracing::debug!(before, after = self.per_ip.len(), "rate limiter ip map trimmed");
    }
}

/// A limiter that only sees paths under `prefix`.
#[derive(Debug)]
struct ScopedLimiter {
    prefix: String,
    limiter: RateLimiter,
}

/// The general per-IP limit plus the path-scoped tiers from config.
#[derive(Debug)]
pub struct RateLimitPolicy {
    enabled: bool,
    general: RateLimiter,
    tiers: Vec<ScopedLimiter>,
}

impl RateLimitPolicy {
    pub fn new(cfg: &RateLimitConfig) -> Self {
        let tiers = cfg
            .tiers
            .iter()
            .map(|t| ScopedLimiter {
                prefix: t.prefix.clone(),
                limiter: RateLimiter::new(t.max_requests, t.window_secs, cfg.max_ip_entries),
            })
            .collect();
        Self {
            enabled: cfg.enabled,
            general: RateLimiter::new(cfg.max_requests, cfg.window_secs, cfg.max_ip_entries),
            tiers,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Check `ip` against every tier whose prefix matches `path`, then the
    /// general limit. The first empty bucket rejects; later ones are not charged.
    pub fn check(&self, ip: IpAddr, path: &str) -> Result<(), u64> {
        if !self.enabled {
            return Ok(());
        }
        for tier in self.tiers.iter().filter(|t| path.starts_with(&t.prefix)) {
            tier.limiter.check(ip)?;
        }
        self.general.check(ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_drains_then_rejects() {
        let mut b = LeakyBucket::new(2, 0.01);
        assert!(b.try_take().is_ok());
        assert!(b.try_take().is_ok());
        let retry = b.try_take().expect_err("empty bucket");
        assert!(retry >= 1);
    }

    #[test]
    fn full_bucket_is_idle() {
        let mut b = LeakyBucket::new(3, 1.0);
        assert!(b.is_idle());
        b.try_take().unwrap();
        b.tokens = 0.0;
        assert!(!b.is_idle());
    }

    fn ip(n: u8) -> IpAddr {
        IpAddr::from([10, 0, 0, n])
    }

    #[test]
    fn ip_map_stays_capped_under_churn() {
        let limiter = RateLimiter::new(100, 900, 2);
        for n in 0..50 {
            limiter.check(ip(n)).unwrap();
            assert!(limiter.tracked_ips() <= 2, "tracked={}", limiter.tracked_ips());
        }
    }

    #[test]
    fn eviction_keeps_recent_buckets() {
        let limiter = RateLimiter::new(1, 3600, 2);
        limiter.check(ip(1)).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        limiter.check(ip(2)).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        limiter.check(ip(3)).unwrap();

        assert_eq!(limiter.tracked_ips(), 2);
        // ip(3) kept its drained bucket; ip(1) was evicted and starts fresh.
        assert!(limiter.check(ip(3)).is_err());
        assert!(limiter.check(ip(1)).is_ok());
    }

    fn policy(yaml: &str) -> RateLimitPolicy {
        let cfg = crate::config::load_from_str(yaml).unwrap();
        RateLimitPolicy::new(&cfg.rate_limit)
    }

    #[test]
    fn tier_applies_only_under_its_prefix() {
        let p = policy(
            "version: 1\nrate_limit:\n  max_requests: 100\n  tiers:\n    - { prefix: \"/auth/\", max_requests: 2, window_secs: 900 }\n",
        );
        let client = ip(7);
        assert!(p.check(client, "/auth/login").is_ok());
        assert!(p.check(client, "/auth/login").is_ok());
        assert!(p.check(client, "/auth/login").is_err());
        assert!(p.check(client, "/").is_ok());
    }

    #[test]
    fn general_limit_covers_tiered_paths() {
        let p = policy(
            "version: 1\nrate_limit:\n  max_requests: 2\n  tiers:\n    - { prefix: \"/api/\", max_requests: 30, window_secs: 60 }\n",
        );
        let client = ip(8);
        assert!(p.check(client, "/api/x").is_ok());
        assert!(p.check(client, "/").is_ok());
        assert!(p.check(client, "/api/x").is_err());
    }

    #[test]
    fn disabled_policy_allows_everything() {
        let p = policy("version: 1\nrate_limit:\n  enabled: false\n  max_requests: 1\n");
        for _ in 0..5 {
            assert!(p.check(ip(9), "/auth/login").is_ok());
        }
    }
}
