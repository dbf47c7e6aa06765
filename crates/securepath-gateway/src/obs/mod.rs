//! Observability: log subscriber setup, Prometheus rendering, and the
//! periodic metrics persistence task.

pub mod persistence;
pub mod prometheus;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

pub use persistence::PersistenceTask;

/// Install the global subscriber. `RUST_LOG` overrides `logging.level`.
pub fn init_tracing(cfg: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level));

    let result = if cfg.json {
        fmt().json().with_env_filter(filter).try_init()
    } else {
        fmt().with_env_filter(filter).try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {e}");
    }
}
