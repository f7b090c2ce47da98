//! System clipboard access.
//!
//! Clipboard failures are never fatal: callers log them and carry on.

use crate::error::{Result, VizError};

/// Clipboard port used by the export keys and the shutdown report.
pub trait ClipboardPort {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// Clipboard backed by `arboard`; may be unavailable on headless systems.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
    init_error: Option<String>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        match arboard::Clipboard::new() {
            Ok(clipboard) => Self {
                inner: Some(clipboard),
                init_error: None,
            },
            Err(e) => {
                log::warn!("Clipboard not available: {}", e);
                Self {
                    inner: None,
                    init_error: Some(e.to_string()),
                }
            }
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardPort for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        match self.inner.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_string())
                .map_err(|e| VizError::clipboard(e.to_string())),
            None => Err(VizError::clipboard(
                self.init_error
                    .clone()
                    .unwrap_or_else(|| "not initialized".to_string()),
            )),
        }
    }
}
