//! `stale-audit audit` command.

use std::env;
use std::path::{Path, PathBuf};

use super::load_config;
use crate::audit::report::{ReportMode, ReportOutcome};
use crate::audit::{run_audit, AuditReport};
use crate::cli::AuditArgs;
use crate::config::Overrides;
use crate::context::ServiceContext;
use crate::document::Document;
use crate::ports::TrackingRepo;

/// Records every port interaction of a live run to this cassette path.
pub const ENV_RECORD: &str = "STALE_AUDIT_RECORD";

const TOKEN_VARS: [&str; 2] = ["OAUTH_TOKEN", "GITHUB_TOKEN"];

/// Where the hosting interactions of a run were served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunSource {
    Live,
    Recording,
    Replay,
}

/// Execute the `audit` command.
///
/// # Errors
///
/// Returns an error string if configuration, the document, the tracking
/// issue lookup, the issue submission, or the cassette fails.
pub async fn run(config_path: Option<&Path>, args: &AuditArgs) -> Result<(), String> {
    let mut config = load_config(config_path)?;
    config.apply_overrides(overrides(args)?);
    config.validate().map_err(|e| e.to_string())?;

    let document = Document::load(&config.readme).map_err(|e| e.to_string())?;
    let ctx = build_context(&config.api_url, args.replay.as_deref())?;
    let source = if args.replay.is_some() {
        RunSource::Replay
    } else if ctx.is_recording() {
        RunSource::Recording
    } else {
        RunSource::Live
    };
    let mode = if args.dry_run {
        ReportMode::DryRun
    } else {
        ReportMode::Submit
    };

    let result = run_audit(&ctx, &config, &document, mode).await;

    // The cassette is written even when the run failed.
    if let Some(path) = ctx.finish().map_err(|e| e.to_string())? {
        eprintln!("Recording saved to: {}", path.display());
    }

    print_report(&result.map_err(|e| e.to_string())?, source);
    Ok(())
}

fn overrides(args: &AuditArgs) -> Result<Overrides, String> {
    let tracking = args
        .tracking_repo
        .as_deref()
        .map(str::parse::<TrackingRepo>)
        .transpose()
        .map_err(|e: String| format!("--tracking-repo: {e}"))?;

    Ok(Overrides {
        readme: args.readme.clone(),
        run_cap: args.limit,
        window_years: args.years,
        tracking,
    })
}

fn build_context(api_url: &str, replay: Option<&Path>) -> Result<ServiceContext, String> {
    if let Some(cassette) = replay {
        tracing::info!(cassette = %cassette.display(), "replaying hosting interactions");
        let ctx = ServiceContext::replaying(cassette);
        return ctx.map_err(|e| e.to_string());
    }

    let token = token();
    if token.is_none() {
        tracing::warn!("no OAUTH_TOKEN or GITHUB_TOKEN set; requests are unauthenticated");
    }

    match env::var_os(ENV_RECORD) {
        Some(path) => {
            let path = PathBuf::from(path);
            tracing::info!(cassette = %path.display(), "recording hosting interactions");
            ServiceContext::recording(api_url, token.as_deref(), &path)
        }
        None => ServiceContext::live(api_url, token.as_deref()),
    }
    .map_err(|e| e.to_string())
}

fn token() -> Option<String> {
    TOKEN_VARS.iter().find_map(|var| {
        let value = env::var(var).ok()?;
        (!value.trim().is_empty()).then_some(value)
    })
}

fn print_report(report: &AuditReport, source: RunSource) {
    let c = &report.classification;
    println!("{}", report.title);
    println!("  newly flagged:      {}", c.entries.len());
    println!("  already reported:   {}", c.already_flagged);
    println!("  not repositories:   {}", c.not_repository);
    println!("  duplicate links:    {}", c.duplicates);
    println!("  failed checks:      {}", c.failed_checks);
    if c.cap_reached {
        println!("  run cap reached; remaining links were not checked");
    }

    println!("{}", outcome_message(&report.outcome, source));
    if let ReportOutcome::DryRun(issue) = &report.outcome {
        println!();
        println!("{}", issue.title);
        print!("{}", issue.body);
    }
}

fn outcome_message(outcome: &ReportOutcome, source: RunSource) -> String {
    match (outcome, source) {
        (ReportOutcome::Skipped, _) => "No stale repositories found.".to_string(),
        (ReportOutcome::DryRun(_), _) => "Dry run; issue not filed:".to_string(),
        (ReportOutcome::Submitted(issue), RunSource::Replay) => {
            let title = &issue.title;
            format!("Replayed submission of \"{title}\"; nothing was filed.")
        }
        (ReportOutcome::Submitted(issue), _) => format!("Tracking issue filed: {}", issue.title),
    }
}
