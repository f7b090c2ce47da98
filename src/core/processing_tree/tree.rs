//! Processing time tree model.
//!
//! One [`ProcessingTimeTree`] is a single report from one producer: the root
//! node carries the producer name and the inclusive time of the whole call,
//! children are kept in call order.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VizError};

/// Capability set a transport message must expose to become a tree.
///
/// Adapters map their wire format onto this shape; the tree model never looks
/// at transport types directly.
pub trait RawSnapshot {
    /// Producer identity. Only read from the root node.
    fn name(&self) -> &str;
    fn label(&self) -> &str;
    /// Inclusive processing time in milliseconds.
    fn processing_time(&self) -> f64;
    fn comment(&self) -> Option<&str>;
    fn children(&self) -> &[Self]
    where
        Self: Sized;
}

/// A node of a processing time report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingTimeTree {
    pub name: String,
    pub label: String,
    pub processing_time: f64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub children: Vec<ProcessingTimeTree>,
}

impl ProcessingTimeTree {
    /// Leaf node helper, mostly for adapters and tests.
    pub fn leaf(name: &str, label: &str, processing_time: f64) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            processing_time,
            comment: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<ProcessingTimeTree>) -> Self {
        self.children = children;
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Build a tree from a raw snapshot.
    ///
    /// Durations must be finite and non-negative; no other validation is done.
    /// Every descendant inherits the root's producer name.
    pub fn from_raw<R: RawSnapshot>(raw: &R) -> Result<Self> {
        Self::from_raw_node(raw, raw.name())
    }

    fn from_raw_node<R: RawSnapshot>(raw: &R, name: &str) -> Result<Self> {
        let processing_time = raw.processing_time();
        if !processing_time.is_finite() || processing_time < 0.0 {
            return Err(VizError::invalid_snapshot(format!(
                "node '{}' of '{}' has processing time {}",
                raw.label(),
                name,
                processing_time
            )));
        }

        let children = raw
            .children()
            .iter()
            .map(|child| Self::from_raw_node(child, name))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            label: raw.label().to_string(),
            processing_time,
            comment: raw
                .comment()
                .filter(|comment| !comment.is_empty())
                .map(str::to_string),
            children,
        })
    }

    /// Inclusive time of the whole call.
    pub fn root_processing_time(&self) -> f64 {
        self.processing_time
    }

    /// Add `other` node-wise into `self`.
    ///
    /// Children are paired by index, not by label. Extra children on either
    /// side are ignored.
    pub fn accumulate(&mut self, other: &ProcessingTimeTree) {
        self.processing_time += other.processing_time;
        for (mine, theirs) in self.children.iter_mut().zip(&other.children) {
            mine.accumulate(theirs);
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ProcessingTimeTree::node_count)
            .sum::<usize>()
    }

    /// Text form of the tree, one entry per displayed node.
    pub fn to_lines(&self, show_comments: bool, summarize: bool) -> Vec<String> {
        let mut root = DisplayNode::from_tree(self);
        if summarize {
            root.children = merge_siblings(std::mem::take(&mut root.children));
        }

        let mut lines = Vec::with_capacity(self.node_count());
        write_node(&root, "", true, true, show_comments, &mut lines);
        lines
    }

    /// `to_lines` joined with trailing newlines, as printed in reports.
    pub fn to_text(&self, show_comments: bool, summarize: bool) -> String {
        self.to_lines(show_comments, summarize)
            .into_iter()
            .map(|line| line + "\n")
            .collect()
    }
}

impl RawSnapshot for ProcessingTimeTree {
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
        self.comment.as_deref()
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Borrowed view used for text output; `count` > 1 after summarizing.
#[derive(Debug)]
struct DisplayNode<'a> {
    label: &'a str,
    processing_time: f64,
    count: usize,
    comment: Option<&'a str>,
    children: Vec<DisplayNode<'a>>,
}

impl<'a> DisplayNode<'a> {
    fn from_tree(tree: &'a ProcessingTimeTree) -> Self {
        Self {
            label: &tree.label,
            processing_time: tree.processing_time,
            count: 1,
            comment: tree.comment.as_deref(),
            children: tree.children.iter().map(DisplayNode::from_tree).collect(),
        }
    }

    fn describe(&self, show_comments: bool) -> String {
        let mut text = format!("{}: {:.2} [ms]", self.label, self.processing_time);
        if self.count > 1 {
            text.push_str(&format!(" (x{})", self.count));
        }
        if show_comments {
            if let Some(comment) = self.comment {
                text.push_str(": ");
                text.push_str(comment);
            }
        }
        text
    }
}

/// Merge siblings sharing a label, keeping first-seen order.
fn merge_siblings(nodes: Vec<DisplayNode<'_>>) -> Vec<DisplayNode<'_>> {
    let mut merged: Vec<DisplayNode<'_>> = Vec::with_capacity(nodes.len());

    for node in nodes {
        match merged.iter_mut().find(|existing| existing.label == node.label) {
            Some(existing) => {
                existing.processing_time += node.processing_time;
                existing.count += node.count;
                if existing.comment.is_none() {
                    existing.comment = node.comment;
                }
                existing.children.extend(node.children);
            }
            None => merged.push(node),
        }
    }

    for node in &mut merged {
        node.children = merge_siblings(std::mem::take(&mut node.children));
    }

    merged
}

fn write_node(
    node: &DisplayNode<'_>,
    lead: &str,
    is_last: bool,
    is_root: bool,
    show_comments: bool,
    lines: &mut Vec<String>,
) {
    let connector = match (is_root, is_last) {
        (true, _) => "",
        (false, true) => "└─ ",
        (false, false) => "├─ ",
    };
    lines.push(format!("{lead}{connector}{}", node.describe(show_comments)));

    let child_lead = match (is_root, is_last) {
        (true, _) => String::new(),
        (false, true) => format!("{lead}   "),
        (false, false) => format!("{lead}│  "),
    };

    let num_children = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        write_node(
            child,
            &child_lead,
            i + 1 == num_children,
            false,
            show_comments,
            lines,
        );
    }
}
