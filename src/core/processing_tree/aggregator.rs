//! Per-producer running state.
//!
//! Every ingested tree updates three maps keyed by producer name: the latest
//! tree, the worst case (largest root time, first seen wins ties) and,
//! when enabled, the node-wise running total.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::tree::ProcessingTimeTree;

pub type ProducerMap = BTreeMap<String, ProcessingTimeTree>;

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    latest: ProducerMap,
    worst_case: ProducerMap,
    total: Option<ProducerMap>,
    applied_count: u64,
    last_applied_at: Option<DateTime<Utc>>,
}

impl Aggregator {
    pub fn new(track_total: bool) -> Self {
        Self {
            total: track_total.then(BTreeMap::new),
            ..Default::default()
        }
    }

    /// Fold one tree into the running state.
    ///
    /// Never fails; shapes are not validated and negative times pass through.
    pub fn apply(&mut self, tree: ProcessingTimeTree) {
        let name = tree.name.clone();

        // Strict `>`: an equal root time keeps the earlier tree.
        let is_new_worst = self
            .worst_case
            .get(&name)
            .map_or(true, |worst| {
                tree.root_processing_time() > worst.root_processing_time()
            });
        if is_new_worst {
            self.worst_case.insert(name.clone(), tree.clone());
        }

        if let Some(total) = self.total.as_mut() {
            total
                .entry(name.clone())
                .and_modify(|sum| sum.accumulate(&tree))
                .or_insert_with(|| tree.clone());
        }

        self.latest.insert(name, tree);
        self.applied_count += 1;
        self.last_applied_at = Some(Utc::now());
    }

    pub fn latest(&self) -> &ProducerMap {
        &self.latest
    }

    pub fn worst_case(&self) -> &ProducerMap {
        &self.worst_case
    }

    /// `None` when total tracking is disabled.
    pub fn total(&self) -> Option<&ProducerMap> {
        self.total.as_ref()
    }

    pub fn tracks_total(&self) -> bool {
        self.total.is_some()
    }

    pub fn producer_count(&self) -> usize {
        self.latest.len()
    }

    pub fn applied_count(&self) -> u64 {
        self.applied_count
    }

    pub fn last_applied_at(&self) -> Option<DateTime<Utc>> {
        self.last_applied_at
    }
}
