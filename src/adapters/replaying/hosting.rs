//! Replaying adapters for the `RepositoryHost` and `IssueTracker` ports.

use std::future::ready;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use super::replay_next;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{
    Commit, HostingFuture, Issue, IssueTracker, RepoPath, RepoStatus, RepositoryHost,
    TrackingRepo,
};

/// Serves recorded repository queries from a cassette.
pub struct ReplayingRepositoryHost {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingRepositoryHost {
    /// Create a replaying host backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

/// Serves recorded issue tracker results from a cassette.
///
/// `create_issue` returns whatever was recorded; nothing is sent anywhere.
pub struct ReplayingIssueTracker {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingIssueTracker {
    /// Create a replaying issue tracker backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl RepositoryHost for ReplayingRepositoryHost {
    fn repository(&self, _repo: &RepoPath) -> HostingFuture<'_, RepoStatus> {
        let result = replay_next::<RepoStatus>(&self.replayer, "repos", "repository");
        Box::pin(ready(result))
    }

    fn commits_since(
        &self,
        _repo: &RepoPath,
        _since: DateTime<Utc>,
    ) -> HostingFuture<'_, Vec<Commit>> {
        let result = replay_next::<Vec<Commit>>(&self.replayer, "repos", "commits_since");
        Box::pin(ready(result))
    }
}

impl IssueTracker for ReplayingIssueTracker {
    fn list_open_issues(&self, _repo: &TrackingRepo) -> HostingFuture<'_, Vec<Issue>> {
        let result = replay_next::<Vec<Issue>>(&self.replayer, "issues", "list_open_issues");
        Box::pin(ready(result))
    }

    fn create_issue(&self, _repo: &TrackingRepo, _issue: &Issue) -> HostingFuture<'_, ()> {
        let result = replay_next::<()>(&self.replayer, "issues", "create_issue");
        Box::pin(ready(result))
    }
}
