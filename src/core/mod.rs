// Core business logic module

pub mod config;
pub mod ingest;
pub mod processing_tree;
pub mod report;
pub mod session;

// Re-export commonly used items
pub use config::VisualizerConfig;
pub use processing_tree::{AggregateView, Aggregator, ProcessingTimeTree, SharedAggregate};
pub use report::{write_report, ReportOutcome};
pub use session::{StopReason, ViewState};
