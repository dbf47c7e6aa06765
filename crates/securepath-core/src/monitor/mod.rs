//! Security monitoring engine.
//!
//! - `aggregator`: in-memory request and security counters (mutex-guarded).
//! - `event`: security event labels fed in by the HTTP layer.
//! - `snapshot`: serializable point-in-time copy of the counters.
//! - `report`: derived security report and recommendations.
//! - `store` / `persister`: append-only per-day JSON snapshot log.
//! - `probe`: live process stats (memory) sampled into each snapshot.
//!
//! Nothing in here surfaces errors to HTTP clients. Persistence failures are
//! logged and swallowed; recording never fails.

pub mod aggregator;
pub mod event;
pub mod persister;
pub mod probe;
pub mod report;
pub mod snapshot;
pub mod store;

pub use aggregator::MetricsAggregator;
pub use event::{AutoBlock, SecurityEvent, SecurityEventKind};
pub use persister::MetricsPersister;
pub use probe::{NullProbe, ProcessProbe, SysinfoProbe};
pub use report::{Recommendation, SecurityReport, Severity, ThreatStatus};
pub use snapshot::{MemoryUsage, MetricsSnapshot, PerformanceStats, RequestCounters, SecurityCounters};
pub use store::MetricsStore;
