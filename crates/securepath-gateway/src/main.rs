//! SecurePath gateway
//!
//! - HTTP API with per-IP rate limiting and request tracking
//! - Security report at /api/security-report, Prometheus text at /metrics
//! - Metrics snapshot appended to a daily JSON file on a fixed interval
//!
//! Usage: `securepath-gateway [config.yaml]` (default `securepath.yaml`).

use std::net::SocketAddr;
use std::time::Duration;

use securepath_core::error::{Result, SecurePathError};
use securepath_gateway::{app_state, config, obs, router};

const DEFAULT_CONFIG_PATH: &str = "securepath.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_from_file(&path)?;
    obs::init_tracing(&cfg.logging);

    let listen = cfg.app.listen_addr()?;
    tracing::info!(
        config = %path,
        name = %cfg.app.name,
        env = %cfg.app.env,
        production = cfg.app.is_production(),
        "configuration loaded"
    );

    let state = app_state::AppState::new(cfg);

    let persistence = if state.cfg().monitoring.enabled {
        let every = Duration::from_secs(state.cfg().monitoring.persist_interval_secs);
        Some(obs::PersistenceTask::spawn(state.persister(), every))
    } else {
        tracing::warn!("monitoring disabled; requests will not be counted or persisted");
        None
    };

    let app = router::build_router(state);

    tracing::info!(%listen, "securepath-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| SecurePathError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SecurePathError::Internal(format!("server failed: {e}")))?;

    if let Some(task) = persistence {
        task.shutdown().await;
    }
    tracing::info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
