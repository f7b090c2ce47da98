// ptviz Library - Public API

// Re-export error types
pub mod error;
pub use error::{Result, VizError};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::VisualizerConfig;

use std::fs::OpenOptions;
use std::path::Path;

/// Initialize logging.
///
/// The dashboard owns the terminal, so logs only go to `log_file`. Without
/// one, logging stays off unless `RUST_LOG` asks for it.
pub fn init_logging(log_file: Option<&Path>) -> std::io::Result<()> {
    let env_configured = std::env::var_os("RUST_LOG").is_some();
    let mut builder = env_logger::Builder::from_default_env();

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            if !env_configured {
                builder.filter_level(log::LevelFilter::Info);
            }
        }
        None => {
            if !env_configured {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }

    // A logger may already be installed (tests, embedding).
    let _ = builder.try_init();
    Ok(())
}
