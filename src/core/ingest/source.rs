//! Ingestion port.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::{broadcast, mpsc};

use crate::core::processing_tree::ProcessingTimeTree;
use crate::error::Result;

/// Future driving one subscription until shutdown or end of stream.
pub type SubscriptionFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A transport that can list topics and stream trees from one of them.
pub trait SnapshotSource: Send + Sync {
    /// Message kind the source discovers, used in setup failure reports.
    fn kind(&self) -> &str;

    /// Topics of the expected kind currently visible.
    fn discover(&self) -> Result<Vec<String>>;

    /// Prepare a subscription to `topic`.
    ///
    /// The returned future sends one tree per arriving message into `sink`
    /// and must stop when `shutdown` fires. Errors returned here are setup
    /// failures; errors inside the stream are logged by the source.
    fn subscribe(
        &self,
        topic: &str,
        sink: mpsc::Sender<ProcessingTimeTree>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<SubscriptionFuture>;
}
