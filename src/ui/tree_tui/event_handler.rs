use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events that can occur in the tree TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// Toggle comment visibility
    ToggleComments,
    /// Toggle summarized view
    ToggleSummarize,
    /// Copy the current view to the clipboard
    Export,
    /// Quit, print the textual report only
    Quit,
    /// Quit, print the report and copy worst cases as JSON
    QuitAndReport,
    /// Ctrl+C while the terminal is in raw mode
    Interrupt,
    /// No action
    None,
}

impl TreeEvent {
    pub fn from_key(key: KeyEvent) -> Self {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => TreeEvent::Interrupt,
                _ => TreeEvent::None,
            };
        }

        match key.code {
            KeyCode::Char('c') => TreeEvent::ToggleComments,
            KeyCode::Char('s') => TreeEvent::ToggleSummarize,
            KeyCode::Char('y') => TreeEvent::Export,
            KeyCode::Char('q') => TreeEvent::Quit,
            KeyCode::Char('r') => TreeEvent::QuitAndReport,
            _ => TreeEvent::None,
        }
    }
}
