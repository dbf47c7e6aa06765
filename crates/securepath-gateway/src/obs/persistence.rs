//! Periodic metrics persistence task.
//!
//! Appends a snapshot to the daily metrics file every `interval`. File I/O runs
//! on the blocking pool so request handling never waits on disk. The task is
//! owned by `main`: `shutdown()` stops the ticker, runs one last flush, and
//! waits for the task to exit.

use std::sync::Arc;
use std::time::Duration;

use securepath_core::monitor::MetricsPersister;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub struct PersistenceTask {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PersistenceTask {
    /// Spawn on the current runtime. The first cycle runs one `interval` from now.
    pub fn spawn(persister: MetricsPersister, interval: Duration) -> Self {
        let (stop, mut stopped) = watch::channel(false);
        let persister = Arc::new(persister);

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::info!(
                interval_secs = interval.as_secs(),
                dir = %persister.store().dir().display(),
                "metrics persistence started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => run_cycle(&persister).await,
                    changed = stopped.changed() => {
                        // Sender dropped counts as a stop request as well.
                        if changed.is_err() || *stopped.borrow() {
                            break;
                        }
                    }
                }
            }

            run_cycle(&persister).await;
            tracing::info!("metrics persistence stopped");
        });

        Self { stop, handle }
    }

    /// Stop the ticker, flush once more, and wait for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "metrics persistence task failed");
        }
    }
}

async fn run_cycle(persister: &Arc<MetricsPersister>) {
    let persister = Arc::clone(persister);
    if let Err(e) = tokio::task::spawn_blocking(move || persister.persist()).await {
        tracing::error!(error = %e, "metrics persistence cycle panicked");
    }
}
