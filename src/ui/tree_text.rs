//! Text rendering of the live view.

use crate::core::ProcessingTimeTree;

pub const DEFAULT_TITLE: &str = "🌲 Processing Time Tree 🌲";

/// Converts trees and view flags into display text.
///
/// Called on every tick, so implementations must be side-effect free.
pub trait RenderPort {
    fn render(
        &self,
        title: &str,
        topic: Option<&str>,
        trees: &[&ProcessingTimeTree],
        show_comments: bool,
        summarize: bool,
    ) -> String;
}

/// Plain box-drawing renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTreeRenderer;

impl RenderPort for TextTreeRenderer {
    fn render(
        &self,
        title: &str,
        topic: Option<&str>,
        trees: &[&ProcessingTimeTree],
        show_comments: bool,
        summarize: bool,
    ) -> String {
        let mut lines = vec![
            title.to_string(),
            format!("topic: {}", topic.unwrap_or("-")),
            String::new(),
        ];

        if trees.is_empty() {
            lines.push("Waiting for messages...".to_string());
        }

        for (i, tree) in trees.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.extend(tree.to_lines(show_comments, summarize));
        }

        lines.join("\n")
    }
}
