//! Core library entry for the `stale-audit` CLI.
//!
//! Audits a curated Markdown list of repository links, flags repositories
//! that are gone, redirected, archived, or inactive, and files one tracking
//! issue per run listing the links not already reported that day.

pub mod adapters;
pub mod audit;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod link;
pub mod ports;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args);
    let cli = cli.map_err(|err| err.to_string())?;
    commands::dispatch(&cli)
}
