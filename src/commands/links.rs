//! `stale-audit links` command.

use std::path::Path;

use super::load_config;
use crate::config::Overrides;
use crate::document::Document;
use crate::link::LinkMatcher;

/// Execute the `links` command.
///
/// Prints every entry link in document order, marking the ones the audit
/// would check. No network calls are made.
///
/// # Errors
///
/// Returns an error string if the configuration or document cannot be read.
pub fn run(config_path: Option<&Path>, readme: Option<&Path>) -> Result<(), String> {
    let mut config = load_config(config_path)?;
    config.apply_overrides(Overrides {
        readme: readme.map(Path::to_path_buf),
        ..Overrides::default()
    });

    let matcher = LinkMatcher::new(&config.site_url);
    let matcher = matcher.map_err(|e| e.to_string())?;
    let document = Document::load(&config.readme).map_err(|e| e.to_string())?;

    let mut total = 0_usize;
    let mut checked = 0_usize;
    for link in document.links() {
        total += 1;
        if matcher.repo_path(&link).is_some() {
            checked += 1;
            println!("repo  {link}");
        } else {
            println!("skip  {link}");
        }
    }
    println!("{total} links, {checked} repository links");
    Ok(())
}
