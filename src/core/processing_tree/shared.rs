//! Thread-safe wrapper around [`Aggregator`].
//!
//! Ingestion tasks run on the tokio runtime while the refresh loop runs on the
//! main thread. All three maps sit behind one lock, held for a single `apply`
//! or a single copy, never across a render.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::aggregator::{Aggregator, ProducerMap};

#[derive(Debug, Clone)]
pub struct SharedAggregate {
    inner: Arc<Mutex<Aggregator>>,
}

/// Owned copy of the aggregate state, taken once per tick.
#[derive(Debug, Clone, Default)]
pub struct AggregateView {
    pub latest: ProducerMap,
    pub worst_case: ProducerMap,
    pub total: Option<ProducerMap>,
    pub applied_count: u64,
    pub last_applied_at: Option<DateTime<Utc>>,
}

impl AggregateView {
    pub fn is_empty(&self) -> bool {
        self.worst_case.is_empty()
    }
}

impl SharedAggregate {
    pub fn new(track_total: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Aggregator::new(track_total))),
        }
    }

    pub fn apply(&self, tree: super::ProcessingTimeTree) {
        self.inner.lock().apply(tree);
    }

    pub fn snapshot(&self) -> AggregateView {
        let guard = self.inner.lock();
        AggregateView {
            latest: guard.latest().clone(),
            worst_case: guard.worst_case().clone(),
            total: guard.total().cloned(),
            applied_count: guard.applied_count(),
            last_applied_at: guard.last_applied_at(),
        }
    }
}
