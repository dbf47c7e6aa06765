//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use securepath_core::error::{Result, SecurePathError};

pub use schema::{
    AppSection, GatewayConfig, LoggingConfig, MonitoringConfig, RateLimitConfig, RateLimitTier,
};

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path).map_err(|e| SecurePathError::Io {
        path: path.into(),
        source: e,
    })?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| SecurePathError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
