//! Live adapter for the hosting ports using the GitHub REST API.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{redirect, Client, Url};
use serde::Deserialize;

use crate::error::{AuditError, ConfigError, HostingError};
use crate::ports::{
    Commit, HostingFuture, Issue, IssueTracker, RepoPath, RepoStatus, RepositoryHost,
    TrackingRepo,
};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("stale-audit/", env!("CARGO_PKG_VERSION"));
const ISSUES_PER_PAGE: &str = "100";

/// Live GitHub client backing both [`RepositoryHost`] and [`IssueTracker`].
///
/// Redirects are never followed so that 301 and 302 answers reach the
/// state check.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
}

/// Subset of the repository metadata body.
#[derive(Deserialize)]
struct RepoBody {
    #[serde(default)]
    archived: bool,
}

impl GitHubClient {
    /// Creates a client for `api_url`, authenticated when `token` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the
    /// underlying client cannot be built.
    pub fn new(api_url: &str, token: Option<&str>) -> Result<Self, AuditError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        if let Some(token) = token {
            let bearer = format!("Bearer {token}");
            let mut value = HeaderValue::from_str(&bearer).map_err(invalid_token)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(AuditError::Client)?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, HostingError> {
        let raw = format!("{}{path}", self.api_url);
        Url::parse(&raw).map_err(|e| {
            let message = e.to_string();
            HostingError::Request { url: raw, message }
        })
    }

    async fn get(&self, url: &Url) -> Result<reqwest::Response, HostingError> {
        self.client
            .get(url.clone())
            .send()
            .await
            .map_err(transport(url))
    }

    fn repo_path(repo: &RepoPath) -> String {
        format!("/repos/{}/{}", repo.owner, repo.name)
    }

    fn issues_path(repo: &TrackingRepo) -> String {
        format!("/repos/{}/{}/issues", repo.owner, repo.name)
    }
}

fn invalid_token(_: InvalidHeaderValue) -> ConfigError {
    ConfigError::Invalid("access token contains invalid header characters".into())
}

fn transport(url: &Url) -> impl FnOnce(reqwest::Error) -> HostingError {
    let url = url.to_string();
    move |source| HostingError::Transport { url, source }
}

fn decode(url: &Url) -> impl FnOnce(reqwest::Error) -> HostingError {
    let url = url.to_string();
    move |e| HostingError::Decode {
        url,
        message: e.to_string(),
    }
}

fn require_success(url: &Url, response: &reqwest::Response) -> Result<(), HostingError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(HostingError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

impl RepositoryHost for GitHubClient {
    fn repository(&self, repo: &RepoPath) -> HostingFuture<'_, RepoStatus> {
        let path = Self::repo_path(repo);
        Box::pin(async move {
            let url = self.endpoint(&path)?;
            let response = self.get(&url).await?;

            let status = response.status();
            if status.is_redirection() || status.is_client_error() || status.is_server_error() {
                return Ok(RepoStatus {
                    status: status.as_u16(),
                    archived: false,
                });
            }

            let body: RepoBody = response.json().await.map_err(decode(&url))?;
            Ok(RepoStatus {
                status: status.as_u16(),
                archived: body.archived,
            })
        })
    }

    fn commits_since(
        &self,
        repo: &RepoPath,
        since: DateTime<Utc>,
    ) -> HostingFuture<'_, Vec<Commit>> {
        let path = format!("{}/commits", Self::repo_path(repo));
        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        Box::pin(async move {
            let mut url = self.endpoint(&path)?;
            url.query_pairs_mut().append_pair("since", &since);

            let response = self.get(&url).await?;
            require_success(&url, &response)?;
            response.json().await.map_err(decode(&url))
        })
    }
}

impl IssueTracker for GitHubClient {
    fn list_open_issues(&self, repo: &TrackingRepo) -> HostingFuture<'_, Vec<Issue>> {
        let path = Self::issues_path(repo);
        Box::pin(async move {
            let mut url = self.endpoint(&path)?;
            url.query_pairs_mut()
                .append_pair("state", "open")
                .append_pair("per_page", ISSUES_PER_PAGE);

            let response = self.get(&url).await?;
            require_success(&url, &response)?;
            response.json().await.map_err(decode(&url))
        })
    }

    fn create_issue(&self, repo: &TrackingRepo, issue: &Issue) -> HostingFuture<'_, ()> {
        let path = Self::issues_path(repo);
        let issue = issue.clone();
        Box::pin(async move {
            let url = self.endpoint(&path)?;
            let response = self
                .client
                .post(url.clone())
                .json(&issue)
                .send()
                .await
                .map_err(transport(&url))?;
            require_success(&url, &response)
        })
    }
}
