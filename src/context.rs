//! Service context bundling the port trait objects an audit run talks to.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::live::{GitHubClient, LiveClock};
use crate::adapters::recording::{RecordingClock, RecordingIssueTracker, RecordingRepositoryHost};
use crate::adapters::replaying::{ReplayingClock, ReplayingIssueTracker, ReplayingRepositoryHost};
use crate::cassette::{Cassette, CassetteRecorder, CassetteReplayer};
use crate::error::{AuditError, CassetteError};
use crate::ports::{Clock, IssueTracker, RepositoryHost};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live, recording,
/// replaying). A recording context must be closed with
/// [`ServiceContext::finish`] to write its cassette.
pub struct ServiceContext {
    /// Clock for the run date and staleness cutoff.
    pub clock: Box<dyn Clock>,
    /// Repository metadata and commit history.
    pub repos: Box<dyn RepositoryHost>,
    /// Tracking issues.
    pub issues: Box<dyn IssueTracker>,
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a context from arbitrary adapters.
    #[must_use]
    pub fn new(
        clock: Box<dyn Clock>,
        repos: Box<dyn RepositoryHost>,
        issues: Box<dyn IssueTracker>,
    ) -> Self {
        Self {
            clock,
            repos,
            issues,
            recorder: None,
        }
    }

    /// Creates a live context against the hosting API at `api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn live(api_url: &str, token: Option<&str>) -> Result<Self, AuditError> {
        let client = GitHubClient::new(api_url, token)?;
        Ok(Self::new(
            Box::new(LiveClock),
            Box::new(client.clone()),
            Box::new(client),
        ))
    }

    /// Creates a live context that also records every interaction.
    ///
    /// The cassette is written to `path` by [`ServiceContext::finish`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn recording(
        api_url: &str,
        token: Option<&str>,
        path: &Path,
    ) -> Result<Self, AuditError> {
        let client = GitHubClient::new(api_url, token)?;
        let recorder = CassetteRecorder::new(path, "stale-audit");
        let recorder = Arc::new(Mutex::new(recorder));

        let clock = RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder));
        let repos = RecordingRepositoryHost::new(Box::new(client.clone()), Arc::clone(&recorder));
        let issues = RecordingIssueTracker::new(Box::new(client), Arc::clone(&recorder));

        Ok(Self {
            clock: Box::new(clock),
            repos: Box::new(repos),
            issues: Box::new(issues),
            recorder: Some(recorder),
        })
    }

    /// Creates a context that serves every port from the cassette at `path`.
    ///
    /// The clock interaction is consumed up front; repository and issue
    /// interactions are consumed as the run asks for them.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or has no usable
    /// clock interaction.
    pub fn replaying(path: &Path) -> Result<Self, AuditError> {
        let cassette = Cassette::load(path)?;
        let mut replayer = CassetteReplayer::new(&cassette);
        let clock = ReplayingClock::new(&mut replayer)?;
        let replayer = Arc::new(Mutex::new(replayer));

        Ok(Self::new(
            Box::new(clock),
            Box::new(ReplayingRepositoryHost::new(Arc::clone(&replayer))),
            Box::new(ReplayingIssueTracker::new(replayer)),
        ))
    }

    /// Returns `true` if this context records a cassette.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Closes the context, writing the cassette if one was being recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn finish(self) -> Result<Option<PathBuf>, AuditError> {
        let Self {
            clock,
            repos,
            issues,
            recorder,
        } = self;
        drop((clock, repos, issues));

        let Some(recorder) = recorder else {
            return Ok(None);
        };
        let recorder = Arc::try_unwrap(recorder)
            .map_err(|_| CassetteError::StillShared)?
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let path = recorder.finish()?;
        tracing::info!(path = %path.display(), "wrote cassette");
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::cassette::Interaction;
    use crate::ports::{RepoPath, TrackingRepo};

    fn interaction(
        seq: u64,
        port: &str,
        method: &str,
        output: serde_json::Value,
    ) -> Interaction {
        Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input: json!(null),
            output,
        }
    }

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).unwrap();
        std::fs::write(path, yaml).unwrap();
    }

    #[tokio::test]
    async fn replaying_context_serves_every_port() {
        let dir = std::env::temp_dir().join("stale_audit_ctx_replay");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("run.cassette.yaml");
        write_cassette(
            &path,
            vec![
                interaction(0, "clock", "now", json!("2026-10-16T09:00:00Z")),
                interaction(1, "issues", "list_open_issues", json!({"Ok": []})),
                interaction(
                    2,
                    "repos",
                    "repository",
                    json!({"Ok": {"status": 200, "archived": true}}),
                ),
            ],
        );

        let ctx = ServiceContext::replaying(&path).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        assert_eq!(ctx.clock.now(), expected);

        let tracking = TrackingRepo {
            owner: "o".into(),
            name: "n".into(),
        };
        let open = ctx.issues.list_open_issues(&tracking).await.unwrap();
        assert!(open.is_empty());

        let repo = RepoPath {
            owner: "a".into(),
            name: "b".into(),
        };
        let status = ctx.repos.repository(&repo).await.unwrap();
        assert!(status.archived);

        assert!(!ctx.is_recording());
        assert_eq!(ctx.finish().unwrap(), None);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn replaying_without_clock_is_an_error() {
        let dir = std::env::temp_dir().join("stale_audit_ctx_no_clock");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("run.cassette.yaml");
        let listing = interaction(0, "issues", "list_open_issues", json!({"Ok": []}));
        write_cassette(&path, vec![listing]);

        let result = ServiceContext::replaying(&path);
        assert!(matches!(
            result,
            Err(AuditError::Cassette(CassetteError::Exhausted { .. }))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_cassette_is_an_error() {
        let result = ServiceContext::replaying(Path::new("/nonexistent/stale-audit.yaml"));
        assert!(matches!(
            result,
            Err(AuditError::Cassette(CassetteError::Io { .. }))
        ));
    }

    #[test]
    fn recording_context_writes_cassette_on_finish() {
        let dir = std::env::temp_dir().join("stale_audit_ctx_record");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("run.cassette.yaml");

        let ctx = ServiceContext::recording("http://127.0.0.1:9", None, &path);
        let ctx = ctx.unwrap();
        assert!(ctx.is_recording());
        let _ = ctx.clock.now();

        let written = ctx.finish().unwrap().unwrap();
        assert_eq!(written, path);
        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.interactions.len(), 1);
        assert_eq!(cassette.interactions[0].port, "clock");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
