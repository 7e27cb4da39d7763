//! Links already reported in today's open tracking issue.

use std::collections::HashSet;

use crate::config::ReasonMessages;
use crate::error::AuditError;
use crate::ports::{IssueTracker, TrackingRepo};

const ITEM_DELIMITER: &str = "- ";
const CHECKBOX_MARKUP: [&str; 3] = ["[ ]", "[x]", "[X]"];

/// Links that an open tracking issue with today's title already lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlaggedSet(HashSet<String>);

impl FlaggedSet {
    /// Returns `true` if `link` has already been reported.
    #[must_use]
    pub fn contains(&self, link: &str) -> bool {
        self.0.contains(link)
    }

    /// Number of reported links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing has been reported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Extend<String> for FlaggedSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<String> for FlaggedSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Recovers the links listed in a tracking issue body.
///
/// Suffixes are removed before whitespace, since every suffix starts with
/// a space.
#[must_use]
pub fn parse_issue_body(body: &str, reasons: &ReasonMessages) -> Vec<String> {
    body.split(ITEM_DELIMITER)
        .filter_map(|item| {
            let mut link = item.replace(['\r', '\n'], "");
            for markup in CHECKBOX_MARKUP {
                link = link.replace(markup, "");
            }
            for suffix in reasons.all() {
                link = link.replace(suffix, "");
            }
            link.retain(|c| !c.is_whitespace());
            (!link.is_empty()).then_some(link)
        })
        .collect()
}

/// Builds the [`FlaggedSet`] from open issues titled exactly `title`.
///
/// # Errors
///
/// Returns an error if the open issues cannot be listed or decoded.
pub async fn load_flagged(
    issues: &dyn IssueTracker,
    tracking: &TrackingRepo,
    title: &str,
    reasons: &ReasonMessages,
) -> Result<FlaggedSet, AuditError> {
    let open = issues
        .list_open_issues(tracking)
        .await
        .map_err(AuditError::LoadFlagged)?;

    let mut flagged = FlaggedSet::default();
    for issue in open.iter().filter(|issue| issue.title == title) {
        flagged.extend(parse_issue_body(&issue.body, reasons));
    }

    tracing::info!(
        open_issues = open.len(),
        already_flagged = flagged.len(),
        tracking = %tracking,
        "loaded previously flagged repositories"
    );
    Ok(flagged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fake::FakeTracker;
    use crate::audit::checks::{StaleEntry, StaleReason};
    use crate::audit::report::render_body;

    const TITLE: &str =
        "Investigate repositories with more than 1 year without update - 2026-10-16";

    fn tracking() -> TrackingRepo {
        TrackingRepo {
            owner: "avelino".into(),
            name: "awesome-go".into(),
        }
    }

    #[test]
    fn rendered_body_round_trips_for_every_reason() {
        let reasons = ReasonMessages::default();
        let entries: Vec<StaleEntry> = [
            StaleReason::DeadLink,
            StaleReason::MovedPermanently,
            StaleReason::Found,
            StaleReason::Archived,
            StaleReason::Inactive,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, reason)| StaleEntry {
            link: format!("https://github.com/acme/repo-{i}"),
            reason,
        })
        .collect();

        let body = render_body(&entries, &reasons);
        let parsed = parse_issue_body(&body, &reasons);

        let expected: Vec<String> = entries.iter().map(|e| e.link.clone()).collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parses_checked_items_and_crlf() {
        let reasons = ReasonMessages::default();
        let body = "\r\n- [x] https://github.com/a/b repository has been archived\r\n\
                    - [ ] https://github.com/c/d\r\n";
        assert_eq!(
            parse_issue_body(body, &reasons),
            vec!["https://github.com/a/b", "https://github.com/c/d"]
        );
    }

    #[test]
    fn empty_body_yields_nothing() {
        assert!(parse_issue_body("", &ReasonMessages::default()).is_empty());
    }

    #[tokio::test]
    async fn only_issues_with_todays_title_count() {
        let tracker = FakeTracker::default()
            .with_open_issue(TITLE, "\n- [ ] https://github.com/a/b\n")
            .with_open_issue(
                "Investigate repositories with more than 1 year without update - 2026-10-15",
                "\n- [ ] https://github.com/old/one\n",
            )
            .with_open_issue("Unrelated bug", "- https://github.com/x/y");

        let flagged = load_flagged(&tracker, &tracking(), TITLE, &ReasonMessages::default())
            .await
            .unwrap();

        assert_eq!(flagged.len(), 1);
        assert!(flagged.contains("https://github.com/a/b"));
        assert!(!flagged.contains("https://github.com/old/one"));
        assert!(!flagged.contains("https://github.com/x/y"));
    }

    #[tokio::test]
    async fn listing_failure_is_fatal() {
        let tracker = FakeTracker::default().failing_list();
        let reasons = ReasonMessages::default();
        let result = load_flagged(&tracker, &tracking(), TITLE, &reasons).await;
        assert!(matches!(result, Err(AuditError::LoadFlagged(_))));
    }
}
