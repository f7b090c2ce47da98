//! Processing time tree model and aggregation.
//!
//! This module holds the business logic of the visualizer: the tree value,
//! the per-producer aggregation and the lock-guarded shared state.

mod aggregator;
mod shared;
mod tree;

pub use aggregator::{Aggregator, ProducerMap};
pub use shared::{AggregateView, SharedAggregate};
pub use tree::{ProcessingTimeTree, RawSnapshot};
