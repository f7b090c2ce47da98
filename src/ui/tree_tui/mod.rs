//! Terminal User Interface for processing time trees.
//!
//! Provides the live refresh loop, the topic menu and the terminal guard
//! using ratatui.

mod app;
mod event_handler;
mod render;
mod terminal;
mod topic_selector;

pub use app::{run_refresh_loop, LoopState, TreeApp};
pub use event_handler::TreeEvent;
pub use render::{render_screen, Screen, TopicMenu, TreeScreen};
pub use terminal::{CrosstermTerminal, TerminalGuard, TerminalPort};
pub use topic_selector::{select_topic, SelectorOutcome, TopicSelector};
