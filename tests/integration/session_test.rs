// Integration tests for a full dashboard session: discovery, terminal
// ownership, the refresh loop and the shutdown report

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ptviz::commands::visualize::run_session;
use ptviz::core::report::{TOTAL_HEADING, WORST_CASE_HEADING};
use ptviz::core::ProcessingTimeTree;
use ptviz::core::StopReason;
use tempfile::TempDir;

use super::support::{
    config_for, key, message, write_topic, MockTerminal, RecordingClipboard, Step,
    TerminalCounters,
};
use ptviz::core::ingest::{JsonlDirectorySource, SnapshotSource, SubscriptionFuture};

fn planning_dir() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_topic(
        temp_dir.path(),
        "planning",
        &[
            message("planner", 10.0, 4.0),
            message("planner", 50.0, 20.0),
            message("planner", 30.0, 6.0),
        ],
    );
    temp_dir
}

#[test]
fn test_quit_prints_report_and_releases_terminal_once() {
    let temp_dir = planning_dir();
    let config = config_for(temp_dir.path());
    let counters = Arc::new(TerminalCounters::default());
    let mut clipboard = RecordingClipboard::default();
    let mut out = Vec::new();

    let outcome = run_session(
        &config,
        Arc::new(JsonlDirectorySource::new(temp_dir.path())),
        || MockTerminal::acquire(counters.clone(), vec![Step::WaitFor("3 message(s)"), key('q')]),
        &mut clipboard,
        &AtomicBool::new(false),
        &mut out,
    )
    .unwrap();

    assert_eq!(outcome.reason, StopReason::Plain);
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(counters.acquired(), 1);
    assert_eq!(counters.released(), 1);
    assert!(clipboard.copied.is_empty());

    let report = String::from_utf8(out).unwrap();
    let worst_at = report.find(WORST_CASE_HEADING).unwrap();
    let total_at = report.find(TOTAL_HEADING).unwrap();
    assert!(total_at < worst_at);
    assert!(report[total_at..worst_at].contains("planner: 90.00 [ms]"));
    assert!(report[worst_at..].contains("planner: 50.00 [ms]"));
    assert!(report[worst_at..].contains("solve: 20.00 [ms]"));
}

#[test]
fn test_report_key_copies_worst_case_json() {
    let temp_dir = planning_dir();
    let config = config_for(temp_dir.path());
    let counters = Arc::new(TerminalCounters::default());
    let mut clipboard = RecordingClipboard::default();
    let mut out = Vec::new();

    let outcome = run_session(
        &config,
        Arc::new(JsonlDirectorySource::new(temp_dir.path())),
        || MockTerminal::acquire(counters.clone(), vec![Step::WaitFor("3 message(s)"), key('r')]),
        &mut clipboard,
        &AtomicBool::new(false),
        &mut out,
    )
    .unwrap();

    assert_eq!(outcome.reason, StopReason::Report);
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(counters.released(), 1);

    let exported: Vec<ProcessingTimeTree> = serde_json::from_str(&clipboard.copied[0]).unwrap();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0].name, "planner");
    assert_eq!(exported[0].processing_time, 50.0);
    assert_eq!(exported[0].children[0].comment.as_deref(), Some("lp"));
}

#[test]
fn test_external_interrupt_releases_terminal_once() {
    let temp_dir = planning_dir();
    let config = config_for(temp_dir.path());
    let counters = Arc::new(TerminalCounters::default());
    let interrupt = Arc::new(AtomicBool::new(false));
    let mut out = Vec::new();

    let outcome = run_session(
        &config,
        Arc::new(JsonlDirectorySource::new(temp_dir.path())),
        || {
            MockTerminal::acquire(
                counters.clone(),
                vec![
                    Step::WaitFor("3 message(s)"),
                    Step::Raise(interrupt.clone()),
                    // Never reached: the flag stops the loop first.
                    key('r'),
                ],
            )
        },
        &mut RecordingClipboard::default(),
        &interrupt,
        &mut out,
    )
    .unwrap();

    assert_eq!(outcome.reason, StopReason::Interrupt);
    assert_eq!(outcome.exit_code, 0);
    assert_eq!(counters.acquired(), 1);
    assert_eq!(counters.released(), 1);
    assert!(String::from_utf8(out).unwrap().contains(WORST_CASE_HEADING));
}

#[test]
fn test_no_messages_exits_nonzero_after_teardown() {
    let temp_dir = TempDir::new().unwrap();
    write_topic(temp_dir.path(), "idle", &[]);
    let config = config_for(temp_dir.path());
    let counters = Arc::new(TerminalCounters::default());
    let mut out = Vec::new();

    let outcome = run_session(
        &config,
        Arc::new(JsonlDirectorySource::new(temp_dir.path())),
        || MockTerminal::acquire(counters.clone(), vec![key('q')]),
        &mut RecordingClipboard::default(),
        &AtomicBool::new(false),
        &mut out,
    )
    .unwrap();

    assert_eq!(outcome.exit_code, 1);
    assert_eq!(counters.released(), 1);
    assert!(out.is_empty());
}

#[test]
fn test_missing_topic_fails_before_terminal_is_acquired() {
    let temp_dir = planning_dir();
    let mut config = config_for(temp_dir.path());
    config.topic = Some("control".to_string());
    config.waiting = std::time::Duration::from_millis(50);
    let counters = Arc::new(TerminalCounters::default());

    let err = run_session(
        &config,
        Arc::new(JsonlDirectorySource::new(temp_dir.path())),
        || MockTerminal::acquire(counters.clone(), vec![key('q')]),
        &mut RecordingClipboard::default(),
        &AtomicBool::new(false),
        &mut std::io::sink(),
    )
    .unwrap_err();

    assert!(err.is_setup_failure());
    assert_eq!(counters.acquired(), 0);
    assert_eq!(counters.released(), 0);
}

#[test]
fn test_empty_directory_fails_fast() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(temp_dir.path());
    let counters = Arc::new(TerminalCounters::default());

    let err = run_session(
        &config,
        Arc::new(JsonlDirectorySource::new(temp_dir.path())),
        || MockTerminal::acquire(counters.clone(), Vec::new()),
        &mut RecordingClipboard::default(),
        &AtomicBool::new(false),
        &mut std::io::sink(),
    )
    .unwrap_err();

    assert!(err.is_setup_failure());
    assert_eq!(counters.acquired(), 0);
}

#[test]
fn test_topic_menu_selects_second_topic() {
    let temp_dir = planning_dir();
    write_topic(temp_dir.path(), "control", &[message("controller", 3.0, 1.0)]);
    let config = config_for(temp_dir.path());
    let counters = Arc::new(TerminalCounters::default());
    let mut out = Vec::new();

    // Topics are listed in name order: control, planning.
    let outcome = run_session(
        &config,
        Arc::new(JsonlDirectorySource::new(temp_dir.path())),
        || {
            MockTerminal::acquire(
                counters.clone(),
                vec![
                    Step::WaitFor("planning"),
                    Step::Key(crossterm::event::KeyCode::Down.into()),
                    Step::Key(crossterm::event::KeyCode::Enter.into()),
                    Step::WaitFor("3 message(s)"),
                    key('q'),
                ],
            )
        },
        &mut RecordingClipboard::default(),
        &AtomicBool::new(false),
        &mut out,
    )
    .unwrap();

    assert_eq!(outcome.exit_code, 0);
    assert_eq!(counters.released(), 1);
    let report = String::from_utf8(out).unwrap();
    assert!(report.contains("planner: 50.00 [ms]"));
    assert!(!report.contains("controller"));
}

#[test]
fn test_cancelled_topic_menu_still_tears_down() {
    let temp_dir = planning_dir();
    write_topic(temp_dir.path(), "control", &[message("controller", 3.0, 1.0)]);
    let config = config_for(temp_dir.path());
    let counters = Arc::new(TerminalCounters::default());
    let mut out = Vec::new();

    let outcome = run_session(
        &config,
        Arc::new(JsonlDirectorySource::new(temp_dir.path())),
        || MockTerminal::acquire(counters.clone(), vec![key('q')]),
        &mut RecordingClipboard::default(),
        &AtomicBool::new(false),
        &mut out,
    )
    .unwrap();

    assert_eq!(outcome.reason, StopReason::Interrupt);
    assert_eq!(outcome.exit_code, 1);
    assert_eq!(counters.released(), 1);
    assert!(out.is_empty());
}

#[test]
fn test_total_tracking_can_be_disabled() {
    let temp_dir = planning_dir();
    let mut config = config_for(temp_dir.path());
    config.track_total = false;
    let counters = Arc::new(TerminalCounters::default());
    let mut out = Vec::new();

    run_session(
        &config,
        Arc::new(JsonlDirectorySource::new(temp_dir.path())),
        || MockTerminal::acquire(counters.clone(), vec![Step::WaitFor("3 message(s)"), key('q')]),
        &mut RecordingClipboard::default(),
        &AtomicBool::new(false),
        &mut out,
    )
    .unwrap();

    let report = String::from_utf8(out).unwrap();
    assert!(!report.contains(TOTAL_HEADING));
    assert!(report.contains(WORST_CASE_HEADING));
}

#[test]
fn test_interrupt_during_discovery_returns_promptly() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_for(temp_dir.path());
    config.waiting = std::time::Duration::from_secs(3);
    let counters = Arc::new(TerminalCounters::default());
    let mut out = Vec::new();

    let start = std::time::Instant::now();
    let outcome = run_session(
        &config,
        Arc::new(JsonlDirectorySource::new(temp_dir.path())),
        || MockTerminal::acquire(counters.clone(), vec![key('q')]),
        &mut RecordingClipboard::default(),
        &AtomicBool::new(true),
        &mut out,
    )
    .unwrap();

    assert!(start.elapsed() < std::time::Duration::from_secs(1));
    assert_eq!(outcome.reason, StopReason::Interrupt);
    assert_eq!(outcome.exit_code, 1);
    assert_eq!(counters.acquired(), 0);
    assert!(out.is_empty());
}

/// Directory source that raises the interrupt flag while discovering,
/// as if Ctrl+C arrived right after the topics became visible.
struct RaiseOnDiscover {
    inner: JsonlDirectorySource,
    interrupt: Arc<AtomicBool>,
}

impl SnapshotSource for RaiseOnDiscover {
    fn kind(&self) -> &str {
        self.inner.kind()
    }

    fn discover(&self) -> ptviz::Result<Vec<String>> {
        let topics = self.inner.discover()?;
        self.interrupt.store(true, Ordering::SeqCst);
        Ok(topics)
    }

    fn subscribe(
        &self,
        topic: &str,
        sink: tokio::sync::mpsc::Sender<ProcessingTimeTree>,
        shutdown: tokio::sync::broadcast::Receiver<()>,
    ) -> ptviz::Result<SubscriptionFuture> {
        self.inner.subscribe(topic, sink, shutdown)
    }
}

#[test]
fn test_interrupt_after_discovery_keeps_terminal_untouched() {
    let temp_dir = planning_dir();
    let config = config_for(temp_dir.path());
    let counters = Arc::new(TerminalCounters::default());
    let interrupt = Arc::new(AtomicBool::new(false));
    let mut out = Vec::new();

    let outcome = run_session(
        &config,
        Arc::new(RaiseOnDiscover {
            inner: JsonlDirectorySource::new(temp_dir.path()),
            interrupt: interrupt.clone(),
        }),
        || MockTerminal::acquire(counters.clone(), vec![key('q')]),
        &mut RecordingClipboard::default(),
        &interrupt,
        &mut out,
    )
    .unwrap();

    assert_eq!(outcome.reason, StopReason::Interrupt);
    assert_eq!(outcome.exit_code, 1);
    assert_eq!(counters.acquired(), 0);
    assert_eq!(counters.released(), 0);
    assert!(out.is_empty());
}
