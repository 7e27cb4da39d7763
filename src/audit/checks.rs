//! Per-link staleness checks.
//!
//! Both checks are fail-open: when the hosting service cannot be asked, the
//! result is [`CheckOutcome::Failed`] and the caller treats the link as not
//! stale.

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::ReasonMessages;
use crate::error::HostingError;
use crate::ports::{RepoPath, RepoStatus, RepositoryHost};

const DAYS_PER_YEAR: i64 = 365;

/// Why a link was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The repository answered with a status of 400 or above.
    DeadLink,
    /// The repository answered 301.
    MovedPermanently,
    /// The repository answered 302.
    Found,
    /// The repository is archived.
    Archived,
    /// No commits within the staleness window.
    Inactive,
}

impl StaleReason {
    /// The suffix written after the link; empty for [`StaleReason::Inactive`].
    #[must_use]
    pub fn suffix(self, messages: &ReasonMessages) -> &str {
        match self {
            Self::DeadLink => &messages.dead_link,
            Self::MovedPermanently => &messages.moved_permanently,
            Self::Found => &messages.found,
            Self::Archived => &messages.archived,
            Self::Inactive => "",
        }
    }
}

/// A flagged link and the reason it was flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleEntry {
    /// The link exactly as it appears in the document.
    pub link: String,
    /// Why it was flagged.
    pub reason: StaleReason,
}

impl StaleEntry {
    /// The link followed by its reason suffix.
    #[must_use]
    pub fn render(&self, messages: &ReasonMessages) -> String {
        format!("{}{}", self.link, self.reason.suffix(messages))
    }
}

/// Result of one check against one link.
#[derive(Debug)]
pub enum CheckOutcome {
    /// The link is stale for the given reason.
    Flagged(StaleReason),
    /// The check found nothing wrong.
    NotFlagged,
    /// The check could not be completed.
    Failed(HostingError),
}

/// Start of the staleness window ending at `now`.
///
/// Windows reaching past the earliest representable instant start there.
#[must_use]
pub fn cutoff(now: DateTime<Utc>, window_years: u32) -> DateTime<Utc> {
    TimeDelta::try_days(DAYS_PER_YEAR * i64::from(window_years))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Maps repository metadata to a reason, first match wins.
#[must_use]
pub fn classify_status(status: RepoStatus) -> Option<StaleReason> {
    match status.status {
        301 => Some(StaleReason::MovedPermanently),
        302 => Some(StaleReason::Found),
        s if s >= 400 => Some(StaleReason::DeadLink),
        _ if status.archived => Some(StaleReason::Archived),
        _ => None,
    }
}

/// Checks whether `repo` is gone, redirected, or archived.
pub async fn check_state(repos: &dyn RepositoryHost, repo: &RepoPath) -> CheckOutcome {
    let status = match repos.repository(repo).await {
        Ok(status) => status,
        Err(e) => return CheckOutcome::Failed(e),
    };

    match classify_status(status) {
        Some(StaleReason::Archived) => {
            tracing::info!(repo = %repo, "repository is archived");
            CheckOutcome::Flagged(StaleReason::Archived)
        }
        Some(StaleReason::DeadLink) => {
            tracing::info!(repo = %repo, status = status.status, "repository might not exist");
            CheckOutcome::Flagged(StaleReason::DeadLink)
        }
        Some(reason) => {
            tracing::info!(repo = %repo, status = status.status, "repository redirected");
            CheckOutcome::Flagged(reason)
        }
        None => CheckOutcome::NotFlagged,
    }
}

/// Checks whether `repo` has had any commit since `cutoff`.
pub async fn check_recency(
    repos: &dyn RepositoryHost,
    repo: &RepoPath,
    cutoff: DateTime<Utc>,
) -> CheckOutcome {
    match repos.commits_since(repo, cutoff).await {
        Ok(commits) if commits.is_empty() => {
            tracing::info!(repo = %repo, since = %cutoff, "no commits within the window");
            CheckOutcome::Flagged(StaleReason::Inactive)
        }
        Ok(_) => CheckOutcome::NotFlagged,
        Err(e) => CheckOutcome::Failed(e),
    }
}
