//! Topic menu shown when several topics were discovered and none was given.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::render::{Screen, TopicMenu};
use super::terminal::TerminalPort;
use crate::error::Result;

const MENU_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorOutcome {
    Pending,
    Selected(String),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct TopicSelector {
    topics: Vec<String>,
    selected: usize,
}

impl TopicSelector {
    pub fn new(topics: Vec<String>) -> Self {
        Self {
            topics,
            selected: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> SelectorOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return SelectorOutcome::Cancelled;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.topics.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(topic) = self.topics.get(self.selected) {
                    return SelectorOutcome::Selected(topic.clone());
                }
            }
            KeyCode::Char('q') | KeyCode::Esc => return SelectorOutcome::Cancelled,
            _ => {}
        }
        SelectorOutcome::Pending
    }

    pub fn screen(&self) -> Screen {
        Screen::TopicMenu(TopicMenu {
            topics: self.topics.clone(),
            selected: self.selected,
        })
    }
}

/// Let the user pick one of `topics`. `None` when cancelled or interrupted.
pub fn select_topic<T: TerminalPort>(
    terminal: &mut T,
    topics: Vec<String>,
    interrupt: &AtomicBool,
) -> Result<Option<String>> {
    let mut selector = TopicSelector::new(topics);

    loop {
        if interrupt.load(Ordering::SeqCst) {
            return Ok(None);
        }
        terminal.draw(&selector.screen())?;

        if let Some(key) = terminal.poll_key(MENU_POLL)? {
            match selector.handle_key(key) {
                SelectorOutcome::Pending => {}
                SelectorOutcome::Selected(topic) => {
                    log::info!("Selected topic '{}'", topic);
                    return Ok(Some(topic));
                }
                SelectorOutcome::Cancelled => return Ok(None),
            }
        }
    }
}
