//! Shared application state for the SecurePath gateway.
//!
//! Built once in `main` and handed to axum as router state. The aggregator
//! lives here rather than in a global so every collaborator gets it injected.

use std::sync::Arc;

use securepath_core::monitor::{MetricsAggregator, MetricsPersister, MetricsStore};

use crate::config::GatewayConfig;
use crate::policy::RateLimitPolicy;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    aggregator: Arc<MetricsAggregator>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    rate_limiter: RateLimitPolicy,
}

impl AppState {
    pub fn new(cfg: GatewayConfig) -> Self {
        Self::with_aggregator(cfg, Arc::new(MetricsAggregator::new()))
    }

    /// Build state around an existing aggregator (tests use a probe-less one).
    pub fn with_aggregator(cfg: GatewayConfig, aggregator: Arc<MetricsAggregator>) -> Self {
        let rate_limiter = RateLimitPolicy::new(&cfg.rate_limit);
        Self {
            inner: Arc::new(AppStateInner { cfg, rate_limiter }),
            aggregator,
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn aggregator(&self) -> Arc<MetricsAggregator> {
        Arc::clone(&self.aggregator)
    }

    pub fn rate_limiter(&self) -> &RateLimitPolicy {
        &self.inner.rate_limiter
    }

    /// Persister writing into the configured metrics directory.
    pub fn persister(&self) -> MetricsPersister {
        let store = MetricsStore::new(&self.inner.cfg.monitoring.metrics_dir);
        MetricsPersister::new(self.aggregator(), store)
    }

    pub fn is_login_path(&self, path: &str) -> bool {
        self.inner.cfg.monitoring.login_paths.iter().any(|p| p == path)
    }
}
