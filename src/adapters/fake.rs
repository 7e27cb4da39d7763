//! In-memory port fakes for unit tests.
//!
//! Clones share state, so a test can hand one clone to the code under test
//! and inspect the calls through another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::error::HostingError;
use crate::ports::{
    Clock, Commit, HostingFuture, Issue, IssueTracker, RepoPath, RepoStatus, RepositoryHost,
    TrackingRepo,
};

/// Clock frozen at a fixed instant.
pub(crate) struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Default)]
struct HostState {
    repos: HashMap<String, Option<RepoStatus>>,
    commits: HashMap<String, Option<usize>>,
    repository_calls: Vec<String>,
    commit_calls: Vec<(String, DateTime<Utc>)>,
}

/// Repository host answering from canned responses.
///
/// Unknown repositories are healthy: status 200, not archived, one commit.
/// A `None` response is served as a transport-style failure.
#[derive(Clone, Default)]
pub(crate) struct FakeHost {
    state: Arc<Mutex<HostState>>,
}

impl FakeHost {
    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap()
    }

    pub(crate) fn with_repo(self, path: &str, status: u16, archived: bool) -> Self {
        let status = RepoStatus { status, archived };
        self.lock().repos.insert(path.into(), Some(status));
        self
    }

    pub(crate) fn with_repo_failure(self, path: &str) -> Self {
        self.lock().repos.insert(path.into(), None);
        self
    }

    pub(crate) fn with_commits(self, path: &str, count: usize) -> Self {
        self.lock().commits.insert(path.into(), Some(count));
        self
    }

    pub(crate) fn with_commits_failure(self, path: &str) -> Self {
        self.lock().commits.insert(path.into(), None);
        self
    }

    pub(crate) fn repository_calls(&self) -> Vec<String> {
        self.lock().repository_calls.clone()
    }

    pub(crate) fn commit_calls(&self) -> Vec<(String, DateTime<Utc>)> {
        self.lock().commit_calls.clone()
    }
}

fn fake_failure(what: &str, repo: &RepoPath) -> HostingError {
    HostingError::Replay(format!("fake {what} failure for {repo}"))
}

impl RepositoryHost for FakeHost {
    fn repository(&self, repo: &RepoPath) -> HostingFuture<'_, RepoStatus> {
        let key = repo.to_string();
        let mut state = self.lock();
        state.repository_calls.push(key.clone());
        let result = match state.repos.get(&key) {
            Some(Some(status)) => Ok(*status),
            Some(None) => Err(fake_failure("repository", repo)),
            None => Ok(RepoStatus {
                status: 200,
                archived: false,
            }),
        };
        Box::pin(std::future::ready(result))
    }

    fn commits_since(
        &self,
        repo: &RepoPath,
        since: DateTime<Utc>,
    ) -> HostingFuture<'_, Vec<Commit>> {
        let key = repo.to_string();
        let mut state = self.lock();
        state.commit_calls.push((key.clone(), since));
        let result = match state.commits.get(&key) {
            Some(Some(count)) => Ok(fake_commits(*count)),
            Some(None) => Err(fake_failure("commits", repo)),
            None => Ok(fake_commits(1)),
        };
        Box::pin(std::future::ready(result))
    }
}

fn fake_commits(count: usize) -> Vec<Commit> {
    (0..count)
        .map(|i| format!("{i:040x}"))
        .map(|sha| Commit { sha })
        .collect()
}

#[derive(Default)]
struct TrackerState {
    open: Vec<Issue>,
    fail_list: bool,
    fail_create: bool,
    list_calls: usize,
    created: Vec<(TrackingRepo, Issue)>,
}

/// Issue tracker holding open issues in memory.
#[derive(Clone, Default)]
pub(crate) struct FakeTracker {
    state: Arc<Mutex<TrackerState>>,
}

impl FakeTracker {
    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap()
    }

    pub(crate) fn with_open_issue(self, title: &str, body: &str) -> Self {
        let issue = Issue {
            title: title.into(),
            body: body.into(),
        };
        self.lock().open.push(issue);
        self
    }

    pub(crate) fn failing_list(self) -> Self {
        self.lock().fail_list = true;
        self
    }

    pub(crate) fn failing_create(self) -> Self {
        self.lock().fail_create = true;
        self
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    pub(crate) fn created(&self) -> Vec<(TrackingRepo, Issue)> {
        self.lock().created.clone()
    }
}

impl IssueTracker for FakeTracker {
    fn list_open_issues(&self, repo: &TrackingRepo) -> HostingFuture<'_, Vec<Issue>> {
        let mut state = self.lock();
        state.list_calls += 1;
        let result = if state.fail_list {
            let url = format!("/repos/{repo}/issues");
            Err(HostingError::Status { url, status: 503 })
        } else {
            Ok(state.open.clone())
        };
        Box::pin(std::future::ready(result))
    }

    fn create_issue(&self, repo: &TrackingRepo, issue: &Issue) -> HostingFuture<'_, ()> {
        let mut state = self.lock();
        let result = if state.fail_create {
            let url = format!("/repos/{repo}/issues");
            Err(HostingError::Status { url, status: 422 })
        } else {
            state.created.push((repo.clone(), issue.clone()));
            Ok(())
        };
        Box::pin(std::future::ready(result))
    }
}
