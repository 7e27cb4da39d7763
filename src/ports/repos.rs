//! Repository host port for per-link metadata queries.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::HostingFuture;

/// The `owner/name` path of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoPath {
    /// Owning user or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// What the metadata endpoint said about a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoStatus {
    /// HTTP status code of the metadata response.
    pub status: u16,
    /// Archived flag from the body; `false` when the body was not decoded.
    pub archived: bool,
}

/// A commit returned by the commits listing. Only presence matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash.
    #[serde(default)]
    pub sha: String,
}

/// Queries repository metadata on the hosting service.
pub trait RepositoryHost: Send + Sync {
    /// Fetches status and archived flag for `repo` without following redirects.
    fn repository(&self, repo: &RepoPath) -> HostingFuture<'_, RepoStatus>;

    /// Lists commits on `repo` made at or after `since`.
    fn commits_since(
        &self,
        repo: &RepoPath,
        since: DateTime<Utc>,
    ) -> HostingFuture<'_, Vec<Commit>>;
}
