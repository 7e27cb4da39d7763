//! Integration tests for top-level CLI behavior.

use std::path::PathBuf;
use std::process::Command;

fn run_stale_audit(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_stale-audit");
    Command::new(bin)
        .args(args)
        .env_remove("STALE_AUDIT_RECORD")
        .env_remove("STALE_AUDIT_README")
        .env_remove("STALE_AUDIT_RUN_CAP")
        .output()
        .expect("failed to run stale-audit binary")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn help_lists_subcommands() {
    let output = run_stale_audit(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("audit"));
    assert!(stdout.contains("links"));
}

#[test]
fn audit_help_shows_overrides() {
    let output = run_stale_audit(&["audit", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--limit"));
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--replay"));
}

#[test]
fn unknown_subcommand_fails() {
    let output = run_stale_audit(&["frobnicate"]);
    assert!(!output.status.success());
}

#[test]
fn links_marks_repository_entries() {
    let dir = scratch_dir("stale_audit_cli_links");
    let readme = dir.join("README.md");
    std::fs::write(
        &readme,
        "- [a](https://github.com/acme/a) - A.\n- [docs](https://acme.dev) - Docs.\n",
    )
    .unwrap();

    let readme = readme.to_str().unwrap();
    let output = run_stale_audit(&["links", "--readme", readme]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("repo  https://github.com/acme/a"));
    assert!(stdout.contains("skip  https://acme.dev"));
    assert!(stdout.contains("2 links, 1 repository links"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn audit_with_missing_document_fails() {
    let output = run_stale_audit(&["audit", "--readme", "/nonexistent/stale-audit/README.md"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("failed to read document"));
}

#[test]
fn invalid_limit_is_rejected_before_reading() {
    let output = run_stale_audit(&["audit", "--limit", "-5", "--readme", "/nonexistent.md"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("run_cap"));
}

const REPLAYED_RUN: &str = r#"name: cli
recorded_at: 2026-10-16T09:00:00Z
interactions:
  - seq: 0
    port: clock
    method: now
    input: null
    output: "2026-10-16T09:00:00Z"
  - seq: 1
    port: issues
    method: list_open_issues
    input: null
    output:
      Ok: []
  - seq: 2
    port: repos
    method: repository
    input: null
    output:
      Ok:
        status: 404
        archived: false
  - seq: 3
    port: issues
    method: create_issue
    input: null
    output:
      Ok: null
"#;

/// Writes a one-entry document and the cassette of its audit run.
fn replay_fixture(name: &str) -> (PathBuf, PathBuf, PathBuf) {
    let dir = scratch_dir(name);
    let readme = dir.join("README.md");
    let entry = "- [gone](https://github.com/acme/gone) - Gone.\n";
    std::fs::write(&readme, entry).unwrap();
    let cassette = dir.join("run.cassette.yaml");
    std::fs::write(&cassette, REPLAYED_RUN).unwrap();
    (dir, readme, cassette)
}

#[test]
fn replayed_dry_run_prints_issue() {
    let (dir, readme, cassette) = replay_fixture("stale_audit_cli_replay");

    let output = run_stale_audit(&[
        "audit",
        "--dry-run",
        "--readme",
        readme.to_str().unwrap(),
        "--replay",
        cassette.to_str().unwrap(),
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");
    assert!(stdout.contains("Dry run; issue not filed"));
    assert!(stdout.contains("2026-10-16"));
    let item = "- [ ] https://github.com/acme/gone this repository might";
    assert!(stdout.contains(item));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn replayed_submission_does_not_claim_an_issue_was_filed() {
    let (dir, readme, cassette) = replay_fixture("stale_audit_cli_replay_submit");

    let output = run_stale_audit(&[
        "audit",
        "--readme",
        readme.to_str().unwrap(),
        "--replay",
        cassette.to_str().unwrap(),
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");
    assert!(stdout.contains("Replayed submission"));
    assert!(stdout.contains("nothing was filed"));
    assert!(!stdout.contains("Tracking issue filed"));

    let _ = std::fs::remove_dir_all(&dir);
}
