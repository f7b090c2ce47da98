use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::Local;

use super::event_handler::TreeEvent;
use super::render::{Screen, TreeScreen};
use super::terminal::TerminalPort;
use crate::core::{AggregateView, SharedAggregate, StopReason, ViewState};
use crate::error::Result;
use crate::platform::ClipboardPort;
use crate::ui::tree_text::RenderPort;

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    Running(Screen),
    Stopped(StopReason),
}

/// Tree TUI application state
pub struct TreeApp {
    pub title: String,
    pub topic: Option<String>,
    pub instance_name: String,
    pub view: ViewState,
    status: Option<String>,
}

impl TreeApp {
    pub fn new(title: &str, topic: Option<String>, instance_name: &str) -> Self {
        Self {
            title: title.to_string(),
            topic,
            instance_name: instance_name.to_string(),
            view: ViewState::default(),
            status: None,
        }
    }

    /// Apply one event and produce the next frame.
    ///
    /// Quit events stop the loop before anything is rendered. Export copies
    /// the text of the frame rendered in the same tick.
    pub fn step(
        &mut self,
        event: TreeEvent,
        aggregate: &AggregateView,
        renderer: &dyn RenderPort,
        clipboard: &mut dyn ClipboardPort,
    ) -> LoopState {
        match event {
            TreeEvent::ToggleComments => self.view.toggle_comments(),
            TreeEvent::ToggleSummarize => self.view.toggle_summarize(),
            TreeEvent::Quit => return LoopState::Stopped(StopReason::Plain),
            TreeEvent::QuitAndReport => return LoopState::Stopped(StopReason::Report),
            TreeEvent::Interrupt => return LoopState::Stopped(StopReason::Interrupt),
            TreeEvent::Export | TreeEvent::None => {}
        }

        let trees: Vec<_> = aggregate.latest.values().collect();
        let text = renderer.render(
            &self.title,
            self.topic.as_deref(),
            &trees,
            self.view.show_comments,
            self.view.summarize,
        );

        if event == TreeEvent::Export {
            match clipboard.copy(&text) {
                Ok(()) => self.status = Some("Copied view to clipboard".to_string()),
                Err(e) => {
                    log::warn!("Export failed: {}", e);
                    self.status = Some(e.to_string());
                }
            }
        }

        LoopState::Running(Screen::Trees(TreeScreen {
            text,
            status: self.status_line(aggregate),
        }))
    }

    fn status_line(&self, aggregate: &AggregateView) -> String {
        let updated = aggregate
            .last_applied_at
            .map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());

        let mut line = format!(
            "{} | {} producer(s) | {} message(s) | updated {} | comments {} | summarize {}",
            self.instance_name,
            aggregate.latest.len(),
            aggregate.applied_count,
            updated,
            on_off(self.view.show_comments),
            on_off(self.view.summarize),
        );
        if let Some(status) = &self.status {
            line.push_str(" | ");
            line.push_str(status);
        }
        line
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Run the fixed-interval refresh loop until a stop reason is observed.
///
/// Each iteration reads at most one key, takes one copy of the aggregate and
/// draws one frame. `interrupt` is checked before every iteration.
pub fn run_refresh_loop<T: TerminalPort>(
    terminal: &mut T,
    app: &mut TreeApp,
    aggregate: &SharedAggregate,
    renderer: &dyn RenderPort,
    clipboard: &mut dyn ClipboardPort,
    interrupt: &AtomicBool,
    tick_rate: Duration,
) -> Result<StopReason> {
    let mut last_tick = Instant::now();

    loop {
        if interrupt.load(Ordering::SeqCst) {
            log::info!("Interrupt received, stopping refresh loop");
            return Ok(StopReason::Interrupt);
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        let event = terminal
            .poll_key(timeout)?
            .map(TreeEvent::from_key)
            .unwrap_or(TreeEvent::None);

        let view = aggregate.snapshot();
        match app.step(event, &view, renderer, clipboard) {
            LoopState::Stopped(reason) => {
                log::info!("Refresh loop stopped: {:?}", reason);
                return Ok(reason);
            }
            LoopState::Running(screen) => terminal.draw(&screen)?,
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}
