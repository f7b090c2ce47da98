//! Terminal display context.
//!
//! The terminal is acquired once per process and must be restored on every
//! exit path before anything is printed to it. [`TerminalGuard`] owns that
//! guarantee: restore runs exactly once, on explicit release or on drop.

use std::io::{self, Stdout};
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::render::{render_screen, Screen};
use crate::error::Result;

/// What the refresh loop needs from a terminal.
pub trait TerminalPort {
    /// Replace the previous frame.
    fn draw(&mut self, screen: &Screen) -> Result<()>;

    /// Wait at most `timeout` for one key press.
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>>;

    /// Give the terminal back to the shell.
    fn restore(&mut self) -> Result<()>;
}

/// Raw-mode alternate-screen terminal drawn with ratatui.
pub struct CrosstermTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl CrosstermTerminal {
    pub fn acquire() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => {
                log::debug!("Terminal acquired");
                Ok(Self { terminal })
            }
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                Err(e.into())
            }
        }
    }
}

impl TerminalPort for CrosstermTerminal {
    fn draw(&mut self, screen: &Screen) -> Result<()> {
        self.terminal.draw(|frame| render_screen(frame, screen))?;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }

    fn restore(&mut self) -> Result<()> {
        // Run every step even if one fails, report the first failure.
        let raw = disable_raw_mode();
        let screen = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let cursor = self.terminal.show_cursor();
        raw?;
        screen?;
        cursor?;
        log::debug!("Terminal restored");
        Ok(())
    }
}

/// Scoped ownership of an acquired terminal.
pub struct TerminalGuard<T: TerminalPort> {
    terminal: T,
    released: bool,
}

impl<T: TerminalPort> TerminalGuard<T> {
    pub fn new(terminal: T) -> Self {
        Self {
            terminal,
            released: false,
        }
    }

    /// Restore the terminal now. Later calls and the drop are no-ops.
    pub fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.terminal.restore()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<T: TerminalPort> Deref for TerminalGuard<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.terminal
    }
}

impl<T: TerminalPort> DerefMut for TerminalGuard<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.terminal
    }
}

impl<T: TerminalPort> Drop for TerminalGuard<T> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::error!("Failed to restore terminal: {}", e);
        }
    }
}
