//! Tokio runtime and orchestrator for snapshot ingestion.
//!
//! Subscriptions run as independent tasks and push decoded trees into one
//! channel. A single orchestrator task drains it and folds every tree into
//! the shared aggregate, so the aggregate has exactly one writer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};

use super::source::SnapshotSource;
use crate::core::processing_tree::{ProcessingTimeTree, SharedAggregate};
use crate::error::Result;

const CHANNEL_CAPACITY: usize = 64;
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

/// Wrapper around the Tokio runtime running the ingestion tasks.
pub struct IngestRuntime {
    shutdown_tx: broadcast::Sender<()>,
    runtime: tokio::runtime::Runtime,
}

impl IngestRuntime {
    /// Subscribe to every topic and start folding trees into `aggregate`.
    ///
    /// All subscriptions are prepared before anything is spawned, so a bad
    /// topic fails the whole start.
    pub fn start(
        source: Arc<dyn SnapshotSource>,
        topics: &[String],
        aggregate: SharedAggregate,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("ingest-worker")
            .build()?;

        let (update_tx, update_rx) = mpsc::channel::<ProcessingTimeTree>(CHANNEL_CAPACITY);
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        let subscriptions = topics
            .iter()
            .map(|topic| source.subscribe(topic, update_tx.clone(), shutdown_tx.subscribe()))
            .collect::<Result<Vec<_>>>()?;
        drop(update_tx);

        runtime.spawn(orchestrator_task(
            update_rx,
            aggregate,
            shutdown_tx.subscribe(),
        ));
        for subscription in subscriptions {
            runtime.spawn(subscription);
        }

        log::info!("Ingestion started for {} topic(s)", topics.len());

        Ok(Self {
            shutdown_tx,
            runtime,
        })
    }

    /// Signal every task to stop and tear the runtime down.
    pub fn shutdown(self) {
        log::info!("Shutting down ingestion");
        // send() only fails when every task already exited
        let _ = self.shutdown_tx.send(());
        self.runtime.shutdown_timeout(SHUTDOWN_GRACE);
    }
}

/// Single writer of the shared aggregate.
async fn orchestrator_task(
    mut update_rx: mpsc::Receiver<ProcessingTimeTree>,
    aggregate: SharedAggregate,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            Some(tree) = update_rx.recv() => {
                log::trace!("Applying tree from '{}'", tree.name);
                aggregate.apply(tree);
            }
            _ = shutdown.recv() => {
                log::debug!("Orchestrator task shutting down");
                break;
            }
        }
    }
}
