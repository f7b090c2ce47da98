//! View flags and stop reasons shared by the refresh loop and the reporter.

/// Display toggles owned by the refresh loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub show_comments: bool,
    pub summarize: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            show_comments: false,
            summarize: true,
        }
    }
}

impl ViewState {
    pub fn toggle_comments(&mut self) {
        self.show_comments = !self.show_comments;
    }

    pub fn toggle_summarize(&mut self) {
        self.summarize = !self.summarize;
    }
}

/// Why the refresh loop stopped. Stopping is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `q`: print the textual report only
    Plain,
    /// `r`: print the report and copy the worst cases as JSON
    Report,
    /// Ctrl+C, SIGTERM or a cancelled topic menu
    Interrupt,
}

impl StopReason {
    pub fn exports_json(self) -> bool {
        self == StopReason::Report
    }
}
