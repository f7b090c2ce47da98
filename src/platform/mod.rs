// Platform-specific integrations

pub mod clipboard;

pub use clipboard::{ClipboardPort, SystemClipboard};
