//! Live process stats sampled into snapshots.

use std::sync::{Mutex, PoisonError};

use sysinfo::{Pid, ProcessesToUpdate, System};

use super::snapshot::MemoryUsage;

/// Source of live process values.
pub trait ProcessProbe: Send + Sync {
    fn memory(&self) -> MemoryUsage;
}

/// Reads the current process's memory through `sysinfo`.
pub struct SysinfoProbe {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!(error = %e, "current pid unavailable; memory usage will read as zero");
                None
            }
        };
        Self {
            system: Mutex::new(System::new()),
            pid,
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe for SysinfoProbe {
    fn memory(&self) -> MemoryUsage {
        let Some(pid) = self.pid else {
            return MemoryUsage::default();
        };
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        system
            .process(pid)
            .map(|p| MemoryUsage {
                resident_bytes: p.memory(),
                virtual_bytes: p.virtual_memory(),
            })
            .unwrap_or_default()
    }
}

/// Always reports zero. Used by tests and when process stats are unwanted.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProbe;

impl ProcessProbe for NullProbe {
    fn memory(&self) -> MemoryUsage {
        MemoryUsage::default()
    }
}
