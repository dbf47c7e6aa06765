use std::net::SocketAddr;

use serde::Deserialize;
use securepath_core::error::{Result, SecurePathError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub monitoring: MonitoringConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SecurePathError::UnsupportedVersion);
        }

        self.app.validate()?;
        self.monitoring.validate()?;
        self.rate_limit.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_env")]
    pub env: String,

    #[serde(default = "default_listen")]
    pub listen: String,

    /// Take the client IP from the rightmost `X-Forwarded-For` hop, the one
    /// appended by the nearest proxy. Left-hand entries are client-supplied.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            env: default_env(),
            listen: default_listen(),
            trust_forwarded_for: false,
        }
    }
}

impl AppSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            SecurePathError::BadConfig(format!("app.listen must be a valid SocketAddr: {e}"))
        })
    }

    pub fn is_production(&self) -> bool {
        self.env == "production"
    }
}

fn default_name() -> String {
    "SecurePath_UK".into()
}
fn default_env() -> String {
    "development".into()
}
fn default_listen() -> String {
    "0.0.0.0:3000".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitoringConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_metrics_dir")]
    pub metrics_dir: String,

    #[serde(default = "default_persist_interval_secs")]
    pub persist_interval_secs: u64,

    /// `POST` to any of these paths counts as a login attempt.
    #[serde(default = "default_login_paths")]
    pub login_paths: Vec<String>,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            metrics_dir: default_metrics_dir(),
            persist_interval_secs: default_persist_interval_secs(),
            login_paths: default_login_paths(),
        }
    }
}

impl MonitoringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.metrics_dir.trim().is_empty() {
            return Err(SecurePathError::BadConfig(
                "monitoring.metrics_dir must not be empty".into(),
            ));
        }
        if !(1..=3600).contains(&self.persist_interval_secs) {
            return Err(SecurePathError::BadConfig(
                "monitoring.persist_interval_secs must be between 1 and 3600".into(),
            ));
        }
        if let Some(bad) = self.login_paths.iter().find(|p| !p.starts_with('/')) {
            return Err(SecurePathError::BadConfig(format!(
                "monitoring.login_paths entries must start with '/': {bad}"
            )));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
fn default_metrics_dir() -> String {
    "logs/metrics".into()
}
fn default_persist_interval_secs() -> u64 {
    60
}
fn default_login_paths() -> Vec<String> {
    vec!["/api/auth/login".into()]
}

/// Per-IP token bucket: `max_requests` capacity, fully refilled over `window_secs`.
///
/// The top-level limit applies to every request. Each tier adds its own bucket
/// for paths under `prefix`; a request must pass every bucket that applies.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Hard cap on tracked IPs per limiter; least recently seen are evicted.
    #[serde(default = "default_max_ip_entries")]
    pub max_ip_entries: usize,

    #[serde(default = "default_tiers")]
    pub tiers: Vec<RateLimitTier>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            max_ip_entries: default_max_ip_entries(),
            tiers: default_tiers(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitTier {
    pub prefix: String,
    pub max_requests: u32,
    pub window_secs: u64,
}

impl RateLimitTier {
    fn new(prefix: &str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            prefix: prefix.into(),
            max_requests,
            window_secs,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.prefix.starts_with('/') {
            return Err(SecurePathError::BadConfig(format!(
                "rate_limit.tiers prefix must start with '/': {}",
                self.prefix
            )));
        }
        if self.max_requests == 0 || self.window_secs == 0 {
            return Err(SecurePathError::BadConfig(format!(
                "rate_limit.tiers {}: max_requests and window_secs must be at least 1",
                self.prefix
            )));
        }
        Ok(())
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_requests == 0 {
            return Err(SecurePathError::BadConfig(
                "rate_limit.max_requests must be at least 1".into(),
            ));
        }
        if self.window_secs == 0 {
            return Err(SecurePathError::BadConfig(
                "rate_limit.window_secs must be at least 1".into(),
            ));
        }
        if self.max_ip_entries == 0 {
            return Err(SecurePathError::BadConfig(
                "rate_limit.max_ip_entries must be at least 1".into(),
            ));
        }
        for tier in &self.tiers {
            tier.validate()?;
        }
        Ok(())
    }

    /// Tokens regained per second.
    pub fn refill_per_sec(&self) -> f64 {
        self.max_requests as f64 / self.window_secs as f64
    }
}

fn default_max_requests() -> u32 {
    100
}
fn default_window_secs() -> u64 {
    900
}
fn default_max_ip_entries() -> usize {
    10_000
}
fn default_tiers() -> Vec<RateLimitTier> {
    vec![
        RateLimitTier::new("/api/", 30, 60),
        RateLimitTier::new("/auth/", 5, 900),
        RateLimitTier::new("/api/auth/", 5, 900),
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".into()
}
