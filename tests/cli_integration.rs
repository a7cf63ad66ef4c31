//! Integration tests for the fructcheck binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary running in an empty directory with no credentials in scope.
fn fructcheck(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fructcheck").expect("binary is built");
    cmd.current_dir(dir.path())
        .env_remove("NUTRITIONIX_APP_ID")
        .env_remove("NUTRITIONIX_APP_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    fructcheck(&dir)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("fructcheck "));
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    fructcheck(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("search")
                .and(predicate::str::contains("history"))
                .and(predicate::str::contains("init"))
                .and(predicate::str::contains("doctor"))
                .and(predicate::str::contains("serve")),
        );
}

#[test]
fn test_search_requires_query() {
    let dir = TempDir::new().unwrap();
    fructcheck(&dir).arg("search").assert().failure();
}

#[test]
fn test_init_creates_config() {
    let dir = TempDir::new().unwrap();

    fructcheck(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("fructcheck initialized"));

    let config = std::fs::read_to_string(dir.path().join("fructcheck.toml")).unwrap();
    assert!(config.contains("[limits]"));
    assert!(config.contains("fructose_grams = 3.0"));
    assert!(dir.path().join(".fructcheck").is_dir());

    let gitignore = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
    assert!(gitignore.contains(".fructcheck/"));
}

#[test]
fn test_init_twice_keeps_existing_config() {
    let dir = TempDir::new().unwrap();
    fructcheck(&dir).arg("init").assert().success();

    fructcheck(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_search_without_credentials_fails() {
    let dir = TempDir::new().unwrap();
    fructcheck(&dir)
        .args(["search", "apple"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NUTRITIONIX_APP_ID"));
}

#[test]
fn test_blank_search_is_not_found() {
    let dir = TempDir::new().unwrap();
    fructcheck(&dir)
        .env("NUTRITIONIX_APP_ID", "test-id")
        .env("NUTRITIONIX_APP_KEY", "test-key")
        .args(["search", "   "])
        .assert()
        .failure()
        .stdout(predicate::str::contains("try another search"));
}

#[test]
fn test_history_on_fresh_directory() {
    let dir = TempDir::new().unwrap();
    fructcheck(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No searches cached yet"));
}

#[test]
fn test_doctor_reports_missing_credentials() {
    let dir = TempDir::new().unwrap();
    fructcheck(&dir)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("credentials missing"));
}

#[test]
fn test_invalid_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("fructcheck.toml"),
        "[limits]\nfructose_grams = -1.0\n",
    )
    .unwrap();

    fructcheck(&dir)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fructose limit: 3 g"));
}
