//! Shutdown report.
//!
//! Printed after the terminal has been restored: the running totals (when
//! tracked) followed by the worst case of every producer.

use std::io::Write;

use colored::Colorize;

use super::processing_tree::{AggregateView, ProducerMap};
use super::session::{StopReason, ViewState};
use crate::error::Result;
use crate::platform::ClipboardPort;

pub const TOTAL_HEADING: &str = "🌲 Total Processing Time Tree 🌲";
pub const WORST_CASE_HEADING: &str = "⏰ Worst Case Execution Time ⏰";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOutcome {
    pub exit_code: u8,
    /// The worst-case JSON reached the clipboard.
    pub copied_json: bool,
}

/// Worst-case trees as a JSON array, one object per producer.
pub fn worst_case_json(view: &AggregateView) -> Result<String> {
    let trees: Vec<_> = view.worst_case.values().collect();
    Ok(serde_json::to_string(&trees)?)
}

/// Write the final report for a stopped session.
///
/// Trees follow the final summarize flag; comments are never printed.
/// Nothing is written when no tree was ever received; the outcome then
/// carries exit code 1.
pub fn write_report<W: Write>(
    view: &AggregateView,
    reason: StopReason,
    view_state: ViewState,
    clipboard: &mut dyn ClipboardPort,
    out: &mut W,
) -> Result<ReportOutcome> {
    if view.is_empty() {
        log::info!("No processing time tree received, nothing to report");
        return Ok(ReportOutcome {
            exit_code: 1,
            copied_json: false,
        });
    }

    if let Some(total) = &view.total {
        write_section(out, TOTAL_HEADING, total, view_state)?;
    }
    write_section(out, WORST_CASE_HEADING, &view.worst_case, view_state)?;
    out.flush()?;

    let mut copied_json = false;
    if reason.exports_json() {
        let json = worst_case_json(view)?;
        match clipboard.copy(&json) {
            Ok(()) => {
                log::info!("Copied {} worst-case tree(s) to clipboard", view.worst_case.len());
                copied_json = true;
            }
            Err(e) => log::warn!("Failed to copy worst-case report: {}", e),
        }
    }

    Ok(ReportOutcome {
        exit_code: 0,
        copied_json,
    })
}

fn write_section<W: Write>(
    out: &mut W,
    heading: &str,
    trees: &ProducerMap,
    view_state: ViewState,
) -> Result<()> {
    writeln!(out, "{}", heading.bold())?;
    for tree in trees.values() {
        write!(out, "{}", tree.to_text(false, view_state.summarize))?;
    }
    Ok(())
}
