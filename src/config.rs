//! Audit configuration: defaults, YAML file, environment, and CLI overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ports::TrackingRepo;

/// Environment variable overriding [`AuditConfig::run_cap`].
pub const ENV_RUN_CAP: &str = "STALE_AUDIT_RUN_CAP";
/// Environment variable overriding [`AuditConfig::window_years`].
pub const ENV_WINDOW_YEARS: &str = "STALE_AUDIT_WINDOW_YEARS";
/// Environment variable overriding [`AuditConfig::tracking`] (`owner/name`).
pub const ENV_TRACKING_REPO: &str = "STALE_AUDIT_TRACKING_REPO";
/// Environment variable overriding [`AuditConfig::readme`].
pub const ENV_README: &str = "STALE_AUDIT_README";

/// Sentinel run cap meaning "no limit".
pub const UNLIMITED_RUN_CAP: i64 = -1;

/// Longest accepted staleness window, in years.
pub const MAX_WINDOW_YEARS: u32 = 100;

/// Everything an audit run needs to know besides credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Markdown document holding the curated list.
    pub readme: PathBuf,
    /// Maximum number of newly flagged links per run; `-1` disables the cap.
    pub run_cap: i64,
    /// A repository without commits in this many years is inactive.
    ///
    /// The default `title_prefix` says "1 year" and is not rewritten when
    /// this changes; set both together.
    pub window_years: u32,
    /// Repository that receives the tracking issue.
    pub tracking: TrackingRepo,
    /// Tracking issue title, before the ` - YYYY-MM-DD` date.
    pub title_prefix: String,
    /// Site prefix every repository link starts with.
    pub site_url: String,
    /// Base URL of the hosting REST API.
    pub api_url: String,
    /// Suffixes appended to flagged links.
    pub reasons: ReasonMessages,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            readme: PathBuf::from("README.md"),
            run_cap: 10,
            window_years: 1,
            tracking: TrackingRepo {
                owner: "avelino".into(),
                name: "awesome-go".into(),
            },
            title_prefix: "Investigate repositories with more than 1 year without update".into(),
            site_url: "https://github.com".into(),
            api_url: "https://api.github.com".into(),
            reasons: ReasonMessages::default(),
        }
    }
}

/// Suffix strings written after a flagged link in the issue body.
///
/// They are also stripped when previous issue bodies are parsed back, so
/// changing them breaks deduplication against issues filed with the old
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReasonMessages {
    /// Status 400 or above.
    pub dead_link: String,
    /// Status 301.
    pub moved_permanently: String,
    /// Status 302.
    pub found: String,
    /// Archived repository.
    pub archived: String,
}

impl Default for ReasonMessages {
    fn default() -> Self {
        Self {
            dead_link: " this repository might no longer exist! (status code >= 400 returned)"
                .into(),
            moved_permanently: " status code 301 received".into(),
            found: " status code 302 received".into(),
            archived: " repository has been archived".into(),
        }
    }
}

impl ReasonMessages {
    /// All suffixes, in the order they are checked.
    #[must_use]
    pub fn all(&self) -> [&str; 4] {
        [
            self.dead_link.as_str(),
            self.moved_permanently.as_str(),
            self.found.as_str(),
            self.archived.as_str(),
        ]
    }
}

/// Upper bound on newly flagged links per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunCap {
    /// Stop once this many links have been flagged.
    Limited(usize),
    /// Never stop early.
    Unlimited,
}

/// Overrides collected from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Replacement document path.
    pub readme: Option<PathBuf>,
    /// Replacement run cap.
    pub run_cap: Option<i64>,
    /// Replacement window in years.
    pub window_years: Option<u32>,
    /// Replacement tracking repository.
    pub tracking: Option<TrackingRepo>,
}

impl AuditConfig {
    /// Loads defaults, overlaid with the YAML file at `path` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `STALE_AUDIT_*` overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable cannot be parsed.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_RUN_CAP) {
            self.run_cap = value.trim().parse().map_err(|_| ConfigError::Env {
                var: ENV_RUN_CAP,
                value,
            })?;
        }
        if let Some(value) = lookup(ENV_WINDOW_YEARS) {
            self.window_years = value.trim().parse().map_err(|_| ConfigError::Env {
                var: ENV_WINDOW_YEARS,
                value,
            })?;
        }
        if let Some(value) = lookup(ENV_TRACKING_REPO) {
            self.tracking = value.trim().parse().map_err(|_| ConfigError::Env {
                var: ENV_TRACKING_REPO,
                value,
            })?;
        }
        if let Some(value) = lookup(ENV_README) {
            self.readme = PathBuf::from(value);
        }
        Ok(())
    }

    /// Applies command-line overrides, which win over everything else.
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(readme) = overrides.readme {
            self.readme = readme;
        }
        if let Some(run_cap) = overrides.run_cap {
            self.run_cap = run_cap;
        }
        if let Some(window_years) = overrides.window_years {
            self.window_years = window_years;
        }
        if let Some(tracking) = overrides.tracking {
            self.tracking = tracking;
        }
    }

    /// Checks the configuration and returns the typed run cap.
    ///
    /// # Errors
    ///
    /// Returns an error if the cap is below `-1`, the window is outside
    /// `1..=MAX_WINDOW_YEARS`, the site URL is empty, or a reason suffix is
    /// empty, repeated, or would split an issue body item.
    pub fn validate(&self) -> Result<RunCap, ConfigError> {
        if !(1..=MAX_WINDOW_YEARS).contains(&self.window_years) {
            return Err(ConfigError::Invalid(format!(
                "window_years must be between 1 and {MAX_WINDOW_YEARS}, got {}",
                self.window_years
            )));
        }
        if self.site_url.trim().is_empty() {
            return Err(ConfigError::Invalid("site_url must not be empty".into()));
        }
        if self.tracking.owner.is_empty() || self.tracking.name.is_empty() {
            return Err(ConfigError::Invalid(
                "tracking repository must be owner/name".into(),
            ));
        }

        let reasons = self.reasons.all();
        if reasons.iter().any(|r| r.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "reason suffixes must not be empty".into(),
            ));
        }
        if reasons.iter().any(|r| r.contains('\n') || r.contains("- ")) {
            return Err(ConfigError::Invalid(
                "reason suffixes must not contain line breaks or \"- \"".into(),
            ));
        }
        for (i, a) in reasons.iter().enumerate() {
            if reasons[i + 1..].contains(a) {
                return Err(ConfigError::Invalid(format!(
                    "reason suffix {a:?} is used twice"
                )));
            }
        }

        match self.run_cap {
            UNLIMITED_RUN_CAP => Ok(RunCap::Unlimited),
            cap => usize::try_from(cap).map(RunCap::Limited).map_err(|_| {
                ConfigError::Invalid(format!(
                    "run_cap must be {UNLIMITED_RUN_CAP} (unlimited) or non-negative, got {cap}"
                ))
            }),
        }
    }
}
