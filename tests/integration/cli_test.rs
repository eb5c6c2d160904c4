//! CLI workflows

use predicates::prelude::*;
use serde_json::Value;

use super::{Workspace, idir};

// =============================================================================
// VERSION
// =============================================================================

#[test]
fn test_version() {
    idir()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("idir v{}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_version_json() {
    let output = idir().args(["--json", "version"]).output().unwrap();
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_no_command_prints_hint() {
    idir()
        .assert()
        .success()
        .stdout(predicate::str::contains("idir --help"));
}

// =============================================================================
// OFFICERS AND TOKENS
// =============================================================================

#[test]
fn test_bootstrap_then_issue_token() {
    let ws = Workspace::new();

    ws.cmd(&["officer", "bootstrap", "chair", "--name", "Chair Person"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chair"));
    assert!(ws.data().join("officers").exists());

    // A second bootstrap leaves the account alone
    let output = ws
        .cmd(&["--json", "officer", "bootstrap", "chair", "--name", "Someone Else"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["created"], false);

    let output = ws.cmd(&["--json", "token", "issue", "chair"]).output().unwrap();
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["username"], "chair");
    assert_eq!(value["token"].as_str().unwrap().split('.').count(), 2);
}

#[test]
fn test_bootstrap_rejects_bad_username() {
    let ws = Workspace::new();
    ws.cmd(&["officer", "bootstrap", "No Spaces", "--name", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_token_for_unknown_officer_fails() {
    let ws = Workspace::new();
    ws.cmd(&["token", "issue", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_token_needs_a_secret() {
    let ws = Workspace::new();
    ws.cmd(&["officer", "bootstrap", "chair", "--name", "Chair"]).assert().success();
    ws.cmd(&["token", "issue", "chair"])
        .env_remove("IDIR_TOKEN_SECRET")
        .assert()
        .failure();
}

// =============================================================================
// DUTY PREVIEW
// =============================================================================

#[test]
fn test_duty_preview_on_empty_society() {
    let ws = Workspace::new();
    let output = ws.cmd(&["--json", "duty", "preview"]).output().unwrap();
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["startAfterId"], 0);
    assert_eq!(value["plan"]["shortfall"], 4);
    assert!(value["plan"]["cemeteryAssignments"].as_array().unwrap().is_empty());
}
