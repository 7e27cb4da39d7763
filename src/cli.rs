//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `stale-audit`.
#[derive(Debug, Parser)]
#[command(
    name = "stale-audit",
    version,
    about = "Find stale repositories in a curated Markdown list"
)]
pub struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Log at debug level unless `STALE_AUDIT_LOG` says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check every repository link and file one tracking issue.
    Audit(AuditArgs),
    /// List the entry links found in the document.
    Links {
        /// Markdown document to read.
        #[arg(long, value_name = "PATH")]
        readme: Option<PathBuf>,
    },
}

/// Options for `stale-audit audit`.
#[derive(Debug, Default, Args)]
pub struct AuditArgs {
    /// Markdown document to audit.
    #[arg(long, value_name = "PATH")]
    pub readme: Option<PathBuf>,
    /// Maximum newly flagged links; -1 removes the limit.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub limit: Option<i64>,
    /// Years without commits before a repository counts as inactive.
    #[arg(long, value_name = "N")]
    pub years: Option<u32>,
    /// Repository receiving the tracking issue, as `owner/name`.
    #[arg(long, value_name = "OWNER/NAME")]
    pub tracking_repo: Option<String>,
    /// Print the issue instead of filing it.
    #[arg(long)]
    pub dry_run: bool,
    /// Serve every hosting interaction from a recorded cassette.
    #[arg(long, value_name = "CASSETTE")]
    pub replay: Option<PathBuf>,
}
