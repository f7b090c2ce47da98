// UI and formatting module

pub mod tree_text;
pub mod tree_tui;

// Re-export commonly used items for cleaner imports
pub use tree_text::{RenderPort, TextTreeRenderer, DEFAULT_TITLE};
