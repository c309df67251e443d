//! Integration tests for the `rtree` binary.
//!
//! These tests run the full CLI against real Git repositories.

use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rtree() -> Command {
    Command::cargo_bin("rtree").unwrap()
}

fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Repository on `main` with a `feature/x` branch, a tag and a stash.
fn sample_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let path = dir.path();
    run_git(path, &["init"]);
    run_git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    run_git(path, &["config", "user.email", "test@example.com"]);
    run_git(path, &["config", "user.name", "Test User"]);

    std::fs::write(path.join("README.md"), "# Test Repo\n").unwrap();
    run_git(path, &["add", "README.md"]);
    run_git(path, &["commit", "-m", "Initial commit"]);
    run_git(path, &["branch", "feature/x"]);
    run_git(path, &["tag", "-a", "v1.0", "-m", "First release"]);

    std::fs::write(path.join("README.md"), "# Changed\n").unwrap();
    run_git(path, &["stash", "push", "-m", "half-done"]);
    dir
}

fn head(dir: &Path) -> String {
    run_git(dir, &["rev-parse", "--abbrev-ref", "HEAD"])
}

#[test]
fn version_flag_works() {
    rtree()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rtree"));
}

#[test]
fn show_prints_every_region() {
    let repo = sample_repo();
    rtree()
        .args(["show"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("▾ Branches"))
        .stdout(predicate::str::contains("* main"))
        .stdout(predicate::str::contains("feature/x"))
        .stdout(predicate::str::contains("v1.0"))
        .stdout(predicate::str::contains("half-done"));
}

#[test]
fn show_collapsed_hides_children() {
    let repo = sample_repo();
    rtree()
        .args(["show", "--collapsed"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("▸ Tags"))
        .stdout(predicate::str::contains("v1.0").not());
}

#[test]
fn show_json_is_structured() {
    let repo = sample_repo();
    let output = rtree()
        .args(["--cwd", repo.path().to_str().unwrap(), "show", "--json", "--flat"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let roots: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let keys: Vec<_> = roots
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["key"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys, vec!["branches", "tags", "stashes"]);

    let branches = roots[0]["children"].as_array().unwrap();
    assert_eq!(branches[0]["label"], "feature/x");
    assert_eq!(branches[1]["accent"], "current");

    let tag = &roots[1]["children"][0];
    assert!(tag["tooltip"].as_str().unwrap().ends_with("First release"));
}

#[test]
fn activate_dry_run_leaves_head() {
    let repo = sample_repo();
    rtree()
        .args(["activate", "branches", "feature/x", "--dry-run"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Would check out feature/x"));
    assert_eq!(head(repo.path()), "main");
}

#[test]
fn activate_branch_checks_out() {
    let repo = sample_repo();
    rtree()
        .args(["activate", "branches", "feature/x"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked out feature/x"));
    assert_eq!(head(repo.path()), "feature/x");
}

#[test]
fn activate_stash_does_nothing() {
    let repo = sample_repo();
    let label = run_git(repo.path(), &["stash", "list", "--format=%gs"]);
    rtree()
        .args(["activate", "stashes", &label])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No action"));
    assert_eq!(head(repo.path()), "main");
}

#[test]
fn activate_quiet_prints_nothing() {
    let repo = sample_repo();
    rtree()
        .args(["-q", "activate", "branches", "feature/x", "--dry-run"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn activate_unknown_label_fails() {
    let repo = sample_repo();
    rtree()
        .args(["activate", "tags", "v9.9"])
        .current_dir(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No node labelled 'v9.9'"));
}

#[test]
fn activate_unknown_region_rejected() {
    rtree()
        .args(["activate", "remotes", "origin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown region"));
}

#[test]
fn outside_repository_fails() {
    let dir = TempDir::new().unwrap();
    rtree()
        .arg("show")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open repository"));
}
