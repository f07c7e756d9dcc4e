//! Smoke tests for command wiring and exit behaviour

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

/// Binary with a scrubbed environment, run from an empty directory so no
/// stray .env or docketload.toml leaks in.
fn docketload(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("docketload").unwrap();
    cmd.env_clear().env("HOME", dir.path()).current_dir(dir.path());
    cmd
}

// === Help ===

#[test]
fn test_load_help() {
    let dir = tempfile::tempdir().unwrap();
    docketload(&dir)
        .arg("load")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--data-dir"))
        .stdout(predicate::str::contains("DB_HOST"));
}

#[test]
fn test_insights_help() {
    let dir = tempfile::tempdir().unwrap();
    docketload(&dir)
        .arg("insights")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--database"));
}

#[test]
fn test_completions_bash() {
    let dir = tempfile::tempdir().unwrap();
    docketload(&dir)
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("docketload"));
}

// === Exit behaviour ===

#[test]
fn test_load_without_connection_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    docketload(&dir)
        .arg("load")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DB_HOST"))
        .stderr(predicate::str::contains("DB_PASSWORD"));
}

#[test]
fn test_insights_without_connection_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    docketload(&dir)
        .arg("insights")
        .env("DB_HOST", "localhost")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DB_NAME"))
        .stderr(predicate::str::contains("DB_HOST").not());
}

#[test]
fn test_load_unreachable_database_fails() {
    let dir = tempfile::tempdir().unwrap();
    docketload(&dir)
        .args(["load", "--host", "127.0.0.1", "--port", "1"])
        .args(["--database", "law_firm", "--user", "loader", "--password", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to connect"));
}

#[test]
fn test_dry_run_needs_no_database() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("cases.csv"),
        "case_id,client_name,end_date\n1000,Acme LLC,\n1001,Globex,2024-03-20\n1002,Initech,\n",
    )
    .unwrap();

    docketload(&dir)
        .args(["load", "--dry-run", "--table", "cases"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cases has 3 rows (2 null cells)"));
}

#[test]
fn test_dry_run_with_missing_sources_still_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    docketload(&dir)
        .args(["load", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("source failed"));
}
