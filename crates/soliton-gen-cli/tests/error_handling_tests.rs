//! Tests for error reporting and exit codes.

use std::path::Path;

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn soliton(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("soliton-gen");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("NO_COLOR");
    cmd
}

fn project(dir: &TempDir) -> std::path::PathBuf {
    soliton(dir.path())
        .args(["init", "shop"])
        .assert()
        .success();
    dir.path().join("shop")
}

#[test]
fn missing_project_exits_not_found() {
    let dir = TempDir::new().unwrap();
    soliton(dir.path())
        .args(["domain", "Invoice"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("go.mod").or(predicate::str::contains("project")));
}

#[test]
fn tidy_outside_a_project_exits_not_found() {
    let dir = TempDir::new().unwrap();
    soliton(dir.path()).arg("tidy").assert().code(3);
}

#[test]
fn unknown_argument_exits_usage() {
    let dir = TempDir::new().unwrap();
    soliton(dir.path()).arg("--no-such-flag").assert().code(2);
}

#[test]
fn unknown_artifact_kind_is_rejected() {
    let dir = TempDir::new().unwrap();
    soliton(dir.path())
        .args(["detail", "widget", "Foo"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown artifact kind"));
}

#[test]
fn unsupported_field_type_is_user_error() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    soliton(&root)
        .args(["domain", "Invoice", "--fields", "amount:money"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("amount"));
    assert!(!root.join("internal/domain/invoice").exists());
}

#[test]
fn invalid_domain_name_is_user_error() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    soliton(&root).args(["domain", "123"]).assert().code(2);
}

#[test]
fn missing_artifact_exits_not_found() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    soliton(&root)
        .args(["detail", "domain", "Ghost"])
        .assert()
        .code(3);
}

#[test]
fn component_without_domain_is_user_error() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    soliton(&root)
        .args(["delete", "policy", "Refund", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("domain"));
}

#[test]
fn delete_without_yes_needs_a_terminal() {
    let dir = TempDir::new().unwrap();
    let root = project(&dir);
    soliton(&root).args(["domain", "Invoice"]).assert().success();

    // stdin is not a terminal under the test harness.
    soliton(&root)
        .args(["delete", "domain", "Invoice"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
    assert!(root.join("internal/domain/invoice").exists());
}

#[test]
fn explicit_missing_config_file_exits_config_error() {
    let dir = TempDir::new().unwrap();
    soliton(dir.path())
        .args(["-c", "does-not-exist.toml", "field-types"])
        .assert()
        .code(4);
}
