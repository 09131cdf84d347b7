//! Terminal rendering of reports and session status.

use std::fmt::Write as _;

use cleansight_engine::{Notifier, WorkflowController, WorkflowError};
use cleansight_types::StoredReport;
use tracing::debug;

const INDENT: &str = "  ";

/// Prints notifications to stderr so stdout carries only report output.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn error(&self, error: &WorkflowError) {
        debug!(%error, retryable = error.is_retryable(), "notifying user");
        if error.is_retryable() {
            eprintln!("error: {error}. Please try again.");
        } else {
            eprintln!("error: {error}");
        }
    }

    fn info(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Render a report as plain text wrapped to `width` columns.
pub fn render_report(stored: &StoredReport, width: usize) -> String {
    let report = &stored.report;
    let body_width = width.saturating_sub(INDENT.len()).max(20);
    let mut out = String::new();

    let _ = writeln!(out, "Data Analysis Report");
    let _ = writeln!(
        out,
        "report {} · received {}",
        stored.handle,
        stored.received_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out.push('\n');

    let _ = writeln!(out, "Executive Summary");
    for line in textwrap::wrap(&report.summary, body_width) {
        let _ = writeln!(out, "{INDENT}{line}");
    }
    out.push('\n');

    let _ = writeln!(out, "{:<20}{}", "Data Quality Score", report.quality_label());
    let _ = writeln!(out, "{:<20}{}", "Missing Values", report.missing_values);
    let _ = writeln!(out, "{:<20}{}", "Outliers Detected", report.outliers);
    out.push('\n');

    let _ = writeln!(out, "Recommendations");
    if report.recommendations.is_empty() {
        let _ = writeln!(out, "{INDENT}none");
    }
    for (index, recommendation) in report.recommendations.iter().enumerate() {
        let marker = format!("{}. ", index + 1);
        let options = textwrap::Options::new(body_width)
            .initial_indent(&marker)
            .subsequent_indent("   ");
        for line in textwrap::wrap(recommendation, options) {
            let _ = writeln!(out, "{INDENT}{line}");
        }
    }

    if !report.visualizations.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "Visualizations (in the PDF report)");
        for label in &report.visualizations {
            let _ = writeln!(out, "{INDENT}- {label}");
        }
    }
    out
}

/// One-line-per-field summary of the controller state.
pub fn render_status(controller: &WorkflowController) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "input:       {}", controller.input().describe());
    let _ = writeln!(out, "submission:  {}", controller.submission_state());
    match controller.report_handle() {
        Some(handle) => {
            let _ = writeln!(out, "report:      {handle}");
        }
        None => {
            let _ = writeln!(out, "report:      none");
        }
    }
    let visibility = if controller.is_report_visible() { "open" } else { "closed" };
    let _ = writeln!(out, "report view: {visibility}");
    out
}
