//! Integration tests for the soliton-gen binary.

use std::fs;
use std::path::Path;

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the user's config, `.env` and log settings.
fn soliton(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("soliton-gen");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("NO_COLOR");
    cmd
}

fn init_project(dir: &TempDir) -> std::path::PathBuf {
    soliton(dir.path())
        .args(["init", "shop", "--module", "example.com/shop"])
        .assert()
        .success();
    dir.path().join("shop")
}

fn json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("valid JSON output")
}

// ── meta ──────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    soliton(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("domain"))
        .stdout(predicate::str::contains("event-handler"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    soliton(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn completions_name_the_binary() {
    let dir = TempDir::new().unwrap();
    soliton(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("soliton-gen"));
}

#[test]
fn field_types_as_json() {
    let dir = TempDir::new().unwrap();
    let out = soliton(dir.path())
        .args(["--output-format", "json", "field-types"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let types = json(&out);
    let names: Vec<&str> = types
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["type"].as_str())
        .collect();
    assert!(names.contains(&"decimal"));
    assert!(names.contains(&"string"));
}

// ── project lifecycle ─────────────────────────────────────────────────────────

#[test]
fn init_creates_module() {
    let dir = TempDir::new().unwrap();
    let root = init_project(&dir);

    let go_mod = fs::read_to_string(root.join("go.mod")).unwrap();
    assert!(go_mod.starts_with("module example.com/shop"));
    assert!(root.join("cmd/main.go").is_file());
    assert!(root.join("internal/domain").is_dir());
}

#[test]
fn init_preview_writes_nothing() {
    let dir = TempDir::new().unwrap();
    soliton(dir.path())
        .args(["init", "shop", "--preview"])
        .assert()
        .success()
        .stdout(predicate::str::contains("go.mod"));
    assert!(!dir.path().join("shop").exists());
}

#[test]
fn domain_then_list() {
    let dir = TempDir::new().unwrap();
    let root = init_project(&dir);

    soliton(dir.path())
        .arg("-C")
        .arg(&root)
        .args(["domain", "Invoice", "--fields", "amount:decimal,status:enum(open|paid)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("internal/domain/invoice/invoice.go"));
    assert!(root.join("internal/domain/invoice/invoice.go").is_file());

    let out = soliton(dir.path())
        .arg("-C")
        .arg(&root)
        .args(["--output-format", "json", "list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let listing = json(&out);
    assert_eq!(listing["domains"][0]["name"], "Invoice");
    assert_eq!(listing["domains"][0]["package"], "invoice");
}

#[test]
fn domain_preview_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let root = init_project(&dir);

    soliton(&root)
        .args(["domain", "Invoice", "--preview"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));
    assert!(!root.join("internal/domain/invoice").exists());
}

#[test]
fn second_generation_skips_existing_files() {
    let dir = TempDir::new().unwrap();
    let root = init_project(&dir);

    soliton(&root).args(["domain", "Invoice"]).assert().success();
    let out = soliton(&root)
        .args(["--output-format", "json", "domain", "Invoice"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let result = json(&out);
    let entity = result["files"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["path"] == "internal/domain/invoice/invoice.go")
        .expect("entity file planned");
    assert_eq!(entity["status"], "skipped");
}

#[test]
fn component_delete_with_yes() {
    let dir = TempDir::new().unwrap();
    let root = init_project(&dir);

    soliton(&root).args(["domain", "Invoice"]).assert().success();
    soliton(&root)
        .args(["policy", "invoice", "Refund", "--target", "Invoice"])
        .assert()
        .success();

    let out = soliton(&root)
        .args(["--output-format", "json", "list", "--domain", "invoice"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let listing = json(&out);
    let policies: Vec<_> = listing["components"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["kind"] == "policy")
        .collect();
    assert_eq!(policies.len(), 1);

    soliton(&root)
        .args(["delete", "policy", "Refund", "--domain", "invoice", "--yes"])
        .assert()
        .success();

    let out = soliton(&root)
        .args(["--output-format", "json", "list", "--domain", "invoice"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let listing = json(&out);
    assert!(
        listing["components"]
            .as_array()
            .unwrap()
            .iter()
            .all(|c| c["kind"] != "policy")
    );
}

#[test]
fn layout_reports_missing_project_without_failing() {
    let dir = TempDir::new().unwrap();
    let out = soliton(dir.path())
        .args(["--output-format", "json", "layout"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(json(&out)["found"], false);
}

#[test]
fn config_init_and_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("soliton.toml");

    soliton(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.is_file());

    soliton(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "project.module_prefix", "example.com/acme"])
        .assert()
        .success();

    soliton(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "project.module_prefix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com/acme"));
}

// ── toolchain ─────────────────────────────────────────────────────────────────

/// A `go` stand-in that records its arguments in `go.log`.
#[cfg(unix)]
fn fake_go(dir: &Path) -> std::ffi::OsString {
    use std::os::unix::fs::PermissionsExt;

    let bin = dir.join("bin");
    fs::create_dir_all(&bin).unwrap();
    let go = bin.join("go");
    fs::write(&go, "#!/bin/sh\necho \"$*\" >> go.log\necho ok\n").unwrap();
    fs::set_permissions(&go, fs::Permissions::from_mode(0o755)).unwrap();

    let mut path = bin.into_os_string();
    if let Some(existing) = std::env::var_os("PATH") {
        path.push(":");
        path.push(existing);
    }
    path
}

#[cfg(unix)]
#[test]
fn tidy_runs_without_migrating() {
    let dir = TempDir::new().unwrap();
    let root = init_project(&dir);
    let path = fake_go(dir.path());

    let out = soliton(&root)
        .env("PATH", &path)
        .args(["--output-format", "json", "tidy"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let result = json(&out);
    assert_eq!(result["success"], true);
    assert_eq!(result["command"], "go mod tidy");

    let calls = fs::read_to_string(root.join("go.log")).unwrap();
    assert_eq!(calls.lines().collect::<Vec<_>>(), vec!["mod tidy"]);
}
