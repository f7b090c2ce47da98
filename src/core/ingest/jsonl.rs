//! Directory-of-JSON-lines transport adapter.
//!
//! Each `<topic>.jsonl` file in the source directory is one topic. Producers
//! append one message per line; the subscription tails the file.
//!
//! A message is a flat node list, the root being the node whose `parent_id`
//! is 0 (or not present in the list):
//!
//! ```json
//! {"nodes":[{"id":1,"name":"planner","processing_time":12.5,"parent_id":0,"comment":""}]}
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};

use super::source::{SnapshotSource, SubscriptionFuture};
use crate::core::processing_tree::{ProcessingTimeTree, RawSnapshot};
use crate::error::{Result, VizError};

pub const MESSAGE_KIND: &str = "ProcessingTimeTree";
const TOPIC_EXTENSION: &str = "jsonl";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub nodes: Vec<WireNode>,
}

/// One node of a flat message. Ids must be non-zero: a `parent_id` of 0
/// marks the root.
#[derive(Debug, Clone, Deserialize)]
pub struct WireNode {
    pub id: u64,
    pub name: String,
    pub processing_time: f64,
    #[serde(default)]
    pub parent_id: u64,
    #[serde(default)]
    pub comment: String,
}

/// Nested form of a [`WireMessage`], exposed to the tree model as a
/// [`RawSnapshot`].
#[derive(Debug, Clone)]
pub struct WireTree {
    name: String,
    label: String,
    processing_time: f64,
    comment: String,
    children: Vec<WireTree>,
}

impl RawSnapshot for WireTree {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn processing_time(&self) -> f64 {
        self.processing_time
    }

    fn comment(&self) -> Option<&str> {
        Some(self.comment.as_str())
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

impl WireMessage {
    /// Rebuild the nested tree from parent ids. Children keep message order.
    pub fn into_tree(self) -> Result<WireTree> {
        if let Some(node) = self.nodes.iter().find(|n| n.id == 0) {
            return Err(VizError::invalid_snapshot(format!(
                "node '{}' uses the reserved id 0",
                node.name
            )));
        }

        let ids: HashSet<u64> = self.nodes.iter().map(|n| n.id).collect();

        let mut children_map: HashMap<u64, Vec<usize>> = HashMap::new();
        for (index, node) in self.nodes.iter().enumerate() {
            children_map.entry(node.parent_id).or_default().push(index);
        }

        let mut roots = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent_id == 0 || !ids.contains(&node.parent_id));
        let (root_index, root) = roots
            .next()
            .ok_or_else(|| VizError::invalid_snapshot("message has no root node"))?;
        if roots.next().is_some() {
            log::debug!("Message from '{}' has several roots, keeping the first", root.name);
        }

        let mut visited = HashSet::new();
        Ok(build_node(
            &self.nodes,
            root_index,
            &root.name,
            &children_map,
            &mut visited,
        ))
    }
}

fn build_node(
    nodes: &[WireNode],
    index: usize,
    producer: &str,
    children_map: &HashMap<u64, Vec<usize>>,
    visited: &mut HashSet<usize>,
) -> WireTree {
    visited.insert(index);
    let node = &nodes[index];

    let mut children = Vec::new();
    if let Some(child_indices) = children_map.get(&node.id) {
        for &child in child_indices {
            // Duplicate ids could otherwise loop forever.
            if !visited.contains(&child) {
                children.push(build_node(nodes, child, producer, children_map, visited));
            }
        }
    }

    WireTree {
        name: producer.to_string(),
        label: node.name.clone(),
        processing_time: node.processing_time,
        comment: node.comment.clone(),
        children,
    }
}

/// Decode one line into a tree.
pub fn parse_message(line: &str) -> Result<ProcessingTimeTree> {
    let message: WireMessage = serde_json::from_str(line)?;
    let wire_tree = message.into_tree()?;
    ProcessingTimeTree::from_raw(&wire_tree)
}

#[derive(Debug, Clone)]
pub struct JsonlDirectorySource {
    dir: PathBuf,
    poll_interval: Duration,
}

impl JsonlDirectorySource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    fn topic_path(&self, topic: &str) -> PathBuf {
        self.dir.join(format!("{topic}.{TOPIC_EXTENSION}"))
    }
}

impl SnapshotSource for JsonlDirectorySource {
    fn kind(&self) -> &str {
        MESSAGE_KIND
    }

    fn discover(&self) -> Result<Vec<String>> {
        let mut topics = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_dir() || path.extension().and_then(|e| e.to_str()) != Some(TOPIC_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                topics.push(stem.to_string());
            }
        }
        topics.sort();
        Ok(topics)
    }

    fn subscribe(
        &self,
        topic: &str,
        sink: mpsc::Sender<ProcessingTimeTree>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<SubscriptionFuture> {
        let path = self.topic_path(topic);
        if !path.is_file() {
            return Err(VizError::topic_not_found(topic));
        }

        let topic = topic.to_string();
        let poll_interval = self.poll_interval;
        Ok(Box::pin(async move {
            if let Err(e) = tail_topic(&path, &topic, sink, shutdown, poll_interval).await {
                log::error!("Subscription to '{}' stopped: {}", topic, e);
            }
        }))
    }
}

/// Follow `path` from the start, delivering every complete line.
async fn tail_topic(
    path: &Path,
    topic: &str,
    sink: mpsc::Sender<ProcessingTimeTree>,
    mut shutdown: broadcast::Receiver<()>,
    poll_interval: Duration,
) -> Result<()> {
    log::info!("Subscribed to '{}' ({})", topic, path.display());

    let mut reader = BufReader::new(File::open(path).await?);
    let mut pending: Vec<u8> = Vec::new();

    loop {
        let read = tokio::select! {
            read = reader.read_until(b'\n', &mut pending) => read?,
            _ = shutdown.recv() => break,
        };

        if read == 0 {
            // At end of file; wait for the producer to append more.
            tokio::select! {
                _ = tokio::time::sleep(poll_interval) => continue,
                _ = shutdown.recv() => break,
            }
        }

        // A partial line stays pending until its newline arrives.
        if pending.last() != Some(&b'\n') {
            continue;
        }

        match std::str::from_utf8(&pending) {
            Ok(line) => {
                let line = line.trim();
                if !line.is_empty() {
                    match parse_message(line) {
                        Ok(tree) => {
                            if sink.send(tree).await.is_err() {
                                log::debug!("Aggregator gone, closing subscription to '{}'", topic);
                                break;
                            }
                        }
                        Err(e) => log::warn!("Skipping malformed message on '{}': {}", topic, e),
                    }
                }
            }
            Err(e) => log::warn!("Skipping non UTF-8 line on '{}': {}", topic, e),
        }
        pending.clear();
    }

    log::info!("Subscription to '{}' shutting down", topic);
    Ok(())
}
