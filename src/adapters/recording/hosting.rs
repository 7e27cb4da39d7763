//! Recording adapters for the `RepositoryHost` and `IssueTracker` ports.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{
    Commit, HostingFuture, Issue, IssueTracker, RepoPath, RepoStatus, RepositoryHost,
    TrackingRepo,
};

/// Records repository queries while delegating to an inner implementation.
pub struct RecordingRepositoryHost {
    inner: Box<dyn RepositoryHost>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingRepositoryHost {
    /// Creates a new recording host wrapping the given implementation.
    pub fn new(inner: Box<dyn RepositoryHost>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

/// Records issue tracker calls while delegating to an inner implementation.
pub struct RecordingIssueTracker {
    inner: Box<dyn IssueTracker>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingIssueTracker {
    /// Creates a new recording issue tracker wrapping the given implementation.
    pub fn new(inner: Box<dyn IssueTracker>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct RepositoryInput<'a> {
    repo: &'a RepoPath,
}

#[derive(Serialize)]
struct CommitsInput<'a> {
    repo: &'a RepoPath,
    since: DateTime<Utc>,
}

#[derive(Serialize)]
struct ListIssuesInput<'a> {
    repo: &'a TrackingRepo,
}

#[derive(Serialize)]
struct CreateIssueInput<'a> {
    repo: &'a TrackingRepo,
    issue: &'a Issue,
}

impl RepositoryHost for RecordingRepositoryHost {
    fn repository(&self, repo: &RepoPath) -> HostingFuture<'_, RepoStatus> {
        let repo = repo.clone();
        Box::pin(async move {
            let result = self.inner.repository(&repo).await;
            let input = RepositoryInput { repo: &repo };
            record_result(&self.recorder, "repos", "repository", &input, &result);
            result
        })
    }

    fn commits_since(
        &self,
        repo: &RepoPath,
        since: DateTime<Utc>,
    ) -> HostingFuture<'_, Vec<Commit>> {
        let repo = repo.clone();
        Box::pin(async move {
            let result = self.inner.commits_since(&repo, since).await;
            let input = CommitsInput { repo: &repo, since };
            record_result(&self.recorder, "repos", "commits_since", &input, &result);
            result
        })
    }
}

impl IssueTracker for RecordingIssueTracker {
    fn list_open_issues(&self, repo: &TrackingRepo) -> HostingFuture<'_, Vec<Issue>> {
        let repo = repo.clone();
        Box::pin(async move {
            let result = self.inner.list_open_issues(&repo).await;
            let input = ListIssuesInput { repo: &repo };
            record_result(
                &self.recorder,
                "issues",
                "list_open_issues",
                &input,
                &result,
            );
            result
        })
    }

    fn create_issue(&self, repo: &TrackingRepo, issue: &Issue) -> HostingFuture<'_, ()> {
        let repo = repo.clone();
        let issue = issue.clone();
        Box::pin(async move {
            let result = self.inner.create_issue(&repo, &issue).await;
            let input = CreateIssueInput {
                repo: &repo,
                issue: &issue,
            };
            record_result(&self.recorder, "issues", "create_issue", &input, &result);
            result
        })
    }
}
