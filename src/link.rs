//! Repository link shape.

use regex::Regex;

use crate::error::ConfigError;
use crate::ports::RepoPath;

/// Recognizes links that point at the root of a hosted repository.
///
/// A link qualifies when it is exactly `<site>/<owner>/<name>` with both
/// segments made of `[A-Za-z0-9._-]`. Anything else (files, sub-pages,
/// other hosts, trailing slashes) is not a repository link.
#[derive(Debug, Clone)]
pub struct LinkMatcher {
    pattern: Regex,
}

impl LinkMatcher {
    /// Builds a matcher for links under `site_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern cannot be compiled.
    pub fn new(site_url: &str) -> Result<Self, ConfigError> {
        let site = regex::escape(site_url.trim_end_matches('/'));
        let pattern = Regex::new(&format!("^{site}/([A-Za-z0-9._-]+)/([A-Za-z0-9._-]+)$"))
            .map_err(|e| ConfigError::Invalid(format!("site_url: {e}")))?;
        Ok(Self { pattern })
    }

    /// Returns the repository path when `link` has the repository shape.
    #[must_use]
    pub fn repo_path(&self, link: &str) -> Option<RepoPath> {
        let captures = self.pattern.captures(link)?;
        Some(RepoPath {
            owner: captures[1].to_string(),
            name: captures[2].to_string(),
        })
    }
}
