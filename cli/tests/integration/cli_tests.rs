//! Argument parsing and top-level behaviour of the `svcmgr` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

pub fn svcmgr(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("svcmgr"));
    cmd.env("NO_COLOR", "1")
        .env("SVCMGR_CONFIG", home.path().join("config.yaml"))
        .env("SVCMGR_ENTITY", home.path().join("entity.json"))
        .env_remove("SVCMGR_TOKEN")
        .env_remove("SVCMGR_TENANT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_no_args_shows_help_and_fails() {
    let home = TempDir::new().expect("home");
    svcmgr(&home)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Deploy and manage service orchestrator instances"));
}

#[test]
fn test_cli_help_lists_lifecycle_commands() {
    let home = TempDir::new().expect("home");
    svcmgr(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("dispose"))
        .stdout(predicate::str::contains("details"))
        .stdout(predicate::str::contains("state"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    let home = TempDir::new().expect("home");
    svcmgr(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("svcmgr"));
}

#[test]
fn test_no_color_env_accepts_conventional_values() {
    let home = TempDir::new().expect("home");
    for value in ["1", "true", "yes", "0", ""] {
        svcmgr(&home)
            .env("NO_COLOR", value)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.yaml"));
    }
}

#[test]
fn test_deploy_requires_term_and_credentials() {
    let home = TempDir::new().expect("home");
    svcmgr(&home)
        .arg("deploy")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--term"))
        .stderr(predicate::str::contains("--token"));
}

#[test]
fn test_deploy_token_value_is_hidden_in_help() {
    let home = TempDir::new().expect("home");
    svcmgr(&home)
        .args(["deploy", "--help"])
        .env("SVCMGR_TOKEN", "s3cr3t-token")
        .assert()
        .success()
        .stdout(predicate::str::contains("SVCMGR_TOKEN"))
        .stdout(predicate::str::contains("s3cr3t-token").not());
}

#[test]
fn test_deploy_without_configuration_reports_missing_settings() {
    let home = TempDir::new().expect("home");
    svcmgr(&home)
        .args(["deploy", "--term", "epc", "--token", "t", "--tenant", "demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cloud_controller.nb_api"))
        .stderr(predicate::str::contains("service_manager.bundle_location"))
        .stderr(predicate::str::contains("service_manager.ssh_key_location"));
    assert!(
        !home.path().join("entity.json").exists(),
        "no entity is recorded when deploy never started"
    );
}

#[test]
fn test_deploy_json_error_carries_code() {
    let home = TempDir::new().expect("home");
    let output = svcmgr(&home)
        .args(["--json", "deploy", "--term", "epc", "--token", "t", "--tenant", "demo"])
        .output()
        .expect("run");

    assert!(!output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json error");
    assert_eq!(doc["error"], true);
    assert_eq!(doc["code"], "configuration_error");
}
