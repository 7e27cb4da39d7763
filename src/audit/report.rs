//! Tracking issue rendering and submission.

use std::fmt::Write;

use chrono::NaiveDate;

use super::checks::StaleEntry;
use crate::config::ReasonMessages;
use crate::error::AuditError;
use crate::ports::{Issue, IssueTracker, TrackingRepo};

/// Whether the rendered issue is filed or only returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Create the issue in the tracking repository.
    Submit,
    /// Render the issue without creating it.
    DryRun,
}

/// What the reporter did with the run's entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Nothing was flagged; the tracker was not contacted.
    Skipped,
    /// The issue was rendered but not filed.
    DryRun(Issue),
    /// The issue was filed.
    Submitted(Issue),
}

/// Title of the tracking issue filed on `date`.
#[must_use]
pub fn issue_title(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix} - {}", date.format("%Y-%m-%d"))
}

/// Renders entries as an unchecked checklist, one item per entry.
#[must_use]
pub fn render_body(entries: &[StaleEntry], reasons: &ReasonMessages) -> String {
    let mut body = String::from("\n");
    for entry in entries {
        let _ = writeln!(body, "\n- [ ] {}", entry.render(reasons));
    }
    body.push('\n');
    body
}

/// Files one issue listing `entries`, or does nothing when there are none.
///
/// # Errors
///
/// Returns an error if the tracker rejects the issue.
pub async fn report(
    issues: &dyn IssueTracker,
    tracking: &TrackingRepo,
    title: &str,
    entries: &[StaleEntry],
    reasons: &ReasonMessages,
    mode: ReportMode,
) -> Result<ReportOutcome, AuditError> {
    if entries.is_empty() {
        tracing::info!("no stale repositories found; not filing an issue");
        return Ok(ReportOutcome::Skipped);
    }

    let issue = Issue {
        title: title.to_string(),
        body: render_body(entries, reasons),
    };
    if mode == ReportMode::DryRun {
        return Ok(ReportOutcome::DryRun(issue));
    }

    issues
        .create_issue(tracking, &issue)
        .await
        .map_err(AuditError::SubmitIssue)?;
    tracing::info!(entries = entries.len(), tracking = %tracking, "filed tracking issue");
    Ok(ReportOutcome::Submitted(issue))
}
