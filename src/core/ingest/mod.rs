//! Snapshot ingestion: the source port, discovery and the runtime that feeds
//! the aggregate.

mod discovery;
pub mod jsonl;
mod runtime;
mod source;

pub use discovery::wait_for_topics;
pub use jsonl::JsonlDirectorySource;
pub use runtime::IngestRuntime;
pub use source::{SnapshotSource, SubscriptionFuture};
