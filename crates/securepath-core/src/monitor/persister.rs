//! One persistence cycle: snapshot the aggregator and append it to the day log.
//!
//! Scheduling lives with the caller (the gateway runs this on an interval in a
//! blocking task). Tests call `persist_on` directly with a fixed day.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::error::Result;

use super::aggregator::MetricsAggregator;
use super::store::MetricsStore;

pub struct MetricsPersister {
    aggregator: Arc<MetricsAggregator>,
    store: MetricsStore,
}

impl MetricsPersister {
    pub fn new(aggregator: Arc<MetricsAggregator>, store: MetricsStore) -> Self {
        Self { aggregator, store }
    }

    pub fn store(&self) -> &MetricsStore {
        &self.store
    }

    /// Append the current snapshot to today's (UTC) file.
    pub fn try_persist(&self) -> Result<usize> {
        self.try_persist_on(Utc::now().date_naive())
    }

    pub fn try_persist_on(&self, day: NaiveDate) -> Result<usize> {
        let snapshot = self.aggregator.snapshot();
        self.store.append(day, &snapshot)
    }

    /// Like `try_persist`, but failures are logged and swallowed.
    pub fn persist(&self) {
        self.persist_on(Utc::now().date_naive());
    }

    pub fn persist_on(&self, day: NaiveDate) {
        match self.try_persist_on(day) {
            Ok(entries) => {
                tracing::debug!(%day, entries, dir = %self.store.dir().display(), "metrics snapshot persisted");
            }
            Err(e) => {
                tracing::error!(%day, code = e.code().as_str(), error = %e, "failed to save metrics");
            }
        }
    }
}
