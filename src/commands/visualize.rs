//! Processing time visualizer command handler.
//!
//! Discovers topics, owns the terminal for the lifetime of the dashboard and
//! prints the final report once the terminal has been restored.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::ingest::{wait_for_topics, IngestRuntime, JsonlDirectorySource, SnapshotSource};
use crate::core::{write_report, SharedAggregate, StopReason, ViewState, VisualizerConfig};
use crate::platform::{ClipboardPort, SystemClipboard};
use crate::ui::tree_tui::{
    run_refresh_loop, select_topic, CrosstermTerminal, TerminalGuard, TerminalPort, TreeApp,
};
use crate::ui::{TextTreeRenderer, DEFAULT_TITLE};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub reason: StopReason,
    pub exit_code: u8,
}

/// Execute the visualizer
pub fn execute(matches: &ArgMatches) -> Result<ExitCode> {
    let config = VisualizerConfig::from_matches(matches).context("Invalid arguments")?;
    crate::init_logging(config.log_file.as_deref()).context("Failed to open log file")?;
    log::info!("Starting {}", config.instance_name);

    let interrupt = Arc::new(AtomicBool::new(false));
    let interrupt_flag = interrupt.clone();
    ctrlc::set_handler(move || {
        interrupt_flag.store(true, Ordering::SeqCst);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    let source = Arc::new(JsonlDirectorySource::new(&config.source_dir));
    let mut clipboard = SystemClipboard::new();
    let mut stdout = io::stdout();

    match run_session(
        &config,
        source,
        CrosstermTerminal::acquire,
        &mut clipboard,
        &interrupt,
        &mut stdout,
    ) {
        Ok(outcome) => {
            if outcome.exit_code != 0 {
                eprintln!("{}", "No processing time tree received.".yellow());
            }
            Ok(ExitCode::from(outcome.exit_code))
        }
        Err(e) if e.is_setup_failure() => {
            log::info!("{}", e);
            eprintln!("{}", e.to_string().red());
            eprintln!("Exiting...");
            Ok(ExitCode::from(1))
        }
        Err(e) => Err(e).context("Failed to run processing time visualizer"),
    }
}

/// Run one dashboard session end to end.
///
/// Discovery happens before the terminal is acquired, so a setup failure or
/// an interrupt raised during setup never touches it. Once acquired, the terminal is released exactly once on
/// every path, before the report is written to `out`.
pub fn run_session<T, F, W>(
    config: &VisualizerConfig,
    source: Arc<dyn SnapshotSource>,
    acquire: F,
    clipboard: &mut dyn ClipboardPort,
    interrupt: &AtomicBool,
    out: &mut W,
) -> crate::Result<SessionOutcome>
where
    T: TerminalPort,
    F: FnOnce() -> crate::Result<T>,
    W: Write,
{
    let topics = match wait_for_topics(
        source.as_ref(),
        config.topic.as_deref(),
        config.waiting,
        interrupt,
    ) {
        Ok(topics) => topics,
        Err(e) if e.is_interrupt() => return Ok(interrupted_during_setup()),
        Err(e) => return Err(e),
    };
    log::info!("Discovered topic(s): {}", topics.join(", "));

    // Last chance to stop before the terminal changes mode.
    if interrupt.load(Ordering::SeqCst) {
        return Ok(interrupted_during_setup());
    }

    let aggregate = SharedAggregate::new(config.track_total);

    let mut guard = TerminalGuard::new(acquire()?);
    let live = drive(
        &mut *guard,
        config,
        source,
        topics,
        &aggregate,
        clipboard,
        interrupt,
    );
    let released = guard.release();
    if let Err(e) = &released {
        log::error!("Failed to restore terminal: {}", e);
    }
    let (reason, view_state) = live?;
    released?;

    let outcome = write_report(&aggregate.snapshot(), reason, view_state, clipboard, out)?;
    Ok(SessionOutcome {
        reason,
        exit_code: outcome.exit_code,
    })
}

/// Nothing was received and the terminal was never taken.
fn interrupted_during_setup() -> SessionOutcome {
    log::info!("Interrupted before the dashboard started");
    SessionOutcome {
        reason: StopReason::Interrupt,
        exit_code: 1,
    }
}

/// Everything that happens while the terminal is held.
fn drive<T: TerminalPort>(
    terminal: &mut T,
    config: &VisualizerConfig,
    source: Arc<dyn SnapshotSource>,
    topics: Vec<String>,
    aggregate: &SharedAggregate,
    clipboard: &mut dyn ClipboardPort,
    interrupt: &AtomicBool,
) -> crate::Result<(StopReason, ViewState)> {
    let topic = if topics.len() == 1 {
        topics.into_iter().next()
    } else {
        select_topic(terminal, topics, interrupt)?
    };
    let Some(topic) = topic else {
        log::info!("Topic selection cancelled");
        return Ok((StopReason::Interrupt, ViewState::default()));
    };

    let runtime = IngestRuntime::start(source, std::slice::from_ref(&topic), aggregate.clone())?;
    let mut app = TreeApp::new(DEFAULT_TITLE, Some(topic), &config.instance_name);

    let stopped = run_refresh_loop(
        terminal,
        &mut app,
        aggregate,
        &TextTreeRenderer,
        clipboard,
        interrupt,
        config.tick_interval,
    );
    runtime.shutdown();

    Ok((stopped?, app.view))
}
