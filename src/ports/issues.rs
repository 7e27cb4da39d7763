//! Issue tracker port for the aggregated tracking issue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::HostingFuture;

/// An issue as read from or written to the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// The issue title.
    pub title: String,
    /// The issue body. The tracker returns `null` for empty bodies.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let body = Option::<String>::deserialize(deserializer)?;
    Ok(body.unwrap_or_default())
}

/// The repository that hosts tracking issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRepo {
    /// Owning user or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl fmt::Display for TrackingRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for TrackingRepo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split_once('/');
        let valid = |part: &str| !part.is_empty() && !part.contains('/');
        match parts {
            Some((owner, name)) if valid(owner) && valid(name) => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(format!("expected owner/name, got {s:?}")),
        }
    }
}

/// Lists and files issues in the tracking repository.
pub trait IssueTracker: Send + Sync {
    /// Lists the currently open issues of `repo`.
    ///
    /// Closed issues are never returned, so links from an issue closed
    /// earlier the same day can be flagged again.
    fn list_open_issues(&self, repo: &TrackingRepo) -> HostingFuture<'_, Vec<Issue>>;

    /// Creates a new issue in `repo`.
    fn create_issue(&self, repo: &TrackingRepo, issue: &Issue) -> HostingFuture<'_, ()>;
}
