//! Stale link audit: classification, deduplication, and reporting.
//!
//! A run walks the document's links in order. Links already listed in
//! today's open tracking issue are skipped, links that are not repository
//! roots are skipped, and every other link gets a state check followed, if
//! that found nothing, by a commit recency check. The run stops early once
//! the run cap is reached.

pub mod checks;
pub mod dedup;
pub mod report;

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::config::{AuditConfig, RunCap};
use crate::context::ServiceContext;
use crate::document::Document;
use crate::error::AuditError;
use crate::link::LinkMatcher;
use crate::ports::{RepoPath, RepositoryHost};

use checks::{CheckOutcome, StaleEntry};
use dedup::FlaggedSet;
use report::{ReportMode, ReportOutcome};

/// Counts links flagged during this run against the cap.
#[derive(Debug, Clone, Copy)]
pub struct RunCounter {
    cap: RunCap,
    accepted: usize,
}

impl RunCounter {
    /// Starts a counter at zero.
    #[must_use]
    pub fn new(cap: RunCap) -> Self {
        Self { cap, accepted: 0 }
    }

    /// Returns `true` once no more links may be flagged.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        match self.cap {
            RunCap::Limited(cap) => self.accepted >= cap,
            RunCap::Unlimited => false,
        }
    }

    /// Records one newly flagged link.
    pub fn accept(&mut self) {
        self.accepted += 1;
    }

    /// Links flagged so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.accepted
    }
}

/// Outcome of classifying a document's links.
#[derive(Debug, Default)]
pub struct Classification {
    /// Newly flagged links, in document order.
    pub entries: Vec<StaleEntry>,
    /// Links skipped because an open tracking issue already lists them.
    pub already_flagged: usize,
    /// Links skipped because they appeared earlier in the same document.
    pub duplicates: usize,
    /// Links skipped because they are not repository roots.
    pub not_repository: usize,
    /// Checks that could not be completed.
    pub failed_checks: usize,
    /// Whether the run cap stopped classification early.
    pub cap_reached: bool,
}

/// Classifies links against the hosting service.
pub struct Auditor<'a> {
    repos: &'a dyn RepositoryHost,
    matcher: &'a LinkMatcher,
    flagged: &'a FlaggedSet,
    cutoff: DateTime<Utc>,
    cap: RunCap,
}

impl<'a> Auditor<'a> {
    /// Creates an auditor; commits before `cutoff` do not count as activity.
    #[must_use]
    pub fn new(
        repos: &'a dyn RepositoryHost,
        matcher: &'a LinkMatcher,
        flagged: &'a FlaggedSet,
        cutoff: DateTime<Utc>,
        cap: RunCap,
    ) -> Self {
        Self {
            repos,
            matcher,
            flagged,
            cutoff,
            cap,
        }
    }

    /// Classifies `links` in order, one at a time.
    pub async fn classify<I>(&self, links: I) -> Classification
    where
        I: IntoIterator<Item = String>,
    {
        let mut counter = RunCounter::new(self.cap);
        let mut seen = HashSet::new();
        let mut result = Classification::default();

        for link in links {
            if counter.is_exhausted() {
                tracing::info!(flagged = counter.count(), "run cap reached; stopping");
                result.cap_reached = true;
                break;
            }
            if self.flagged.contains(&link) {
                tracing::debug!(link = %link, "already reported in an open issue");
                result.already_flagged += 1;
                continue;
            }
            let Some(repo) = self.matcher.repo_path(&link) else {
                tracing::debug!(link = %link, "not a repository link; not handled");
                result.not_repository += 1;
                continue;
            };
            if !seen.insert(link.clone()) {
                result.duplicates += 1;
                continue;
            }

            if let Some(entry) = self.classify_link(link, &repo, &mut result).await {
                counter.accept();
                result.entries.push(entry);
            }
        }

        result
    }

    async fn classify_link(
        &self,
        link: String,
        repo: &RepoPath,
        result: &mut Classification,
    ) -> Option<StaleEntry> {
        // Commit recency is only consulted when the state check found nothing.
        let outcome = match checks::check_state(self.repos, repo).await {
            CheckOutcome::Flagged(reason) => CheckOutcome::Flagged(reason),
            CheckOutcome::NotFlagged => checks::check_recency(self.repos, repo, self.cutoff).await,
            CheckOutcome::Failed(e) => {
                tracing::warn!(link = %link, error = %e, "state check failed");
                result.failed_checks += 1;
                checks::check_recency(self.repos, repo, self.cutoff).await
            }
        };

        match outcome {
            CheckOutcome::Flagged(reason) => Some(StaleEntry { link, reason }),
            CheckOutcome::NotFlagged => None,
            CheckOutcome::Failed(e) => {
                tracing::warn!(link = %link, error = %e, "commit check failed");
                result.failed_checks += 1;
                None
            }
        }
    }
}

/// Everything one audit run produced.
#[derive(Debug)]
pub struct AuditReport {
    /// Title shared by today's tracking issues.
    pub title: String,
    /// How many links were already reported before this run.
    pub previously_flagged: usize,
    /// Classification results.
    pub classification: Classification,
    /// What happened to the tracking issue.
    pub outcome: ReportOutcome,
}

/// Runs a full audit of `document` through the ports in `ctx`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the open tracking
/// issues cannot be loaded, or the new issue cannot be filed. Per-link
/// failures never abort the run.
pub async fn run_audit(
    ctx: &ServiceContext,
    config: &AuditConfig,
    document: &Document,
    mode: ReportMode,
) -> Result<AuditReport, AuditError> {
    let cap = config.validate()?;
    let matcher = LinkMatcher::new(&config.site_url)?;

    let now = ctx.clock.now();
    let title = report::issue_title(&config.title_prefix, now.date_naive());
    let flagged = dedup::load_flagged(
        ctx.issues.as_ref(),
        &config.tracking,
        &title,
        &config.reasons,
    )
    .await?;

    let cutoff = checks::cutoff(now, config.window_years);
    let auditor = Auditor::new(ctx.repos.as_ref(), &matcher, &flagged, cutoff, cap);
    let classification = auditor.classify(document.links()).await;
    tracing::info!(
        flagged = classification.entries.len(),
        already_flagged = classification.already_flagged,
        not_repository = classification.not_repository,
        failed_checks = classification.failed_checks,
        "classification finished"
    );

    let outcome = report::report(
        ctx.issues.as_ref(),
        &config.tracking,
        &title,
        &classification.entries,
        &config.reasons,
        mode,
    )
    .await?;

    Ok(AuditReport {
        title,
        previously_flagged: flagged.len(),
        classification,
        outcome,
    })
}
