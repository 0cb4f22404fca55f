/// End-to-end tests for config file loading and CLI option merging.
///
/// These tests exercise the full flow from config file on disk through CLI invocation
/// to correct output, using `assert_cmd` and `tempfile` for isolated test environments.
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

const FIXTURE: &str = "tests/fixtures/sample-workspace";

/// Copy a directory tree.
fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), target).unwrap();
        }
    }
}

/// Create a copy of the sample workspace that tests may modify.
fn create_test_workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let workspace = dir.path().join("workspace");
    copy_dir(Path::new(FIXTURE), &workspace);
    (dir, workspace)
}

/// Write a config file at the specified path.
fn write_config(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn package_names(document: &Value) -> Vec<&str> {
    document["packages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|package| package["name"].as_str().unwrap())
        .collect()
}

// ============================================================================
// Auto-discovery
// ============================================================================

#[test]
fn test_config_auto_discovered_in_workspace() {
    let (_dir, workspace) = create_test_workspace();
    write_config(
        &workspace.join("pnpm-sbom.config.yml"),
        r#"
format: yaml
document:
  name: discovered-config
  organization: Acme
"#,
    );

    cargo_bin_cmd!("pnpm-sbom")
        .arg("-p")
        .arg(&workspace)
        .arg("--listing")
        .arg(workspace.join("listing.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("name: discovered-config"))
        .stdout(predicate::str::contains("Organization: Acme"));
}

#[test]
fn test_no_config_uses_defaults() {
    let (_dir, workspace) = create_test_workspace();

    let output = cargo_bin_cmd!("pnpm-sbom")
        .arg("-p")
        .arg(&workspace)
        .arg("--listing")
        .arg(workspace.join("listing.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let document: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["name"], "workspace");
}

// ============================================================================
// Explicit config and CLI precedence
// ============================================================================

#[test]
fn test_explicit_config_excludes_scope() {
    let (dir, workspace) = create_test_workspace();
    let config_path = dir.path().join("custom.yml");
    write_config(
        &config_path,
        r#"
excludes:
  scopes:
    - pattern: devDependencies
      reason: DEV_DEPENDENCY_OF
"#,
    );

    let output = cargo_bin_cmd!("pnpm-sbom")
        .arg("-p")
        .arg(&workspace)
        .arg("--listing")
        .arg(workspace.join("listing.json"))
        .arg("-c")
        .arg(&config_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let document: Value = serde_json::from_slice(&output.stdout).unwrap();
    let names = package_names(&document);
    assert!(names.contains(&"lodash"));
    assert!(!names.contains(&"typescript"));
}

#[test]
fn test_cli_overrides_config_values() {
    let (_dir, workspace) = create_test_workspace();
    write_config(
        &workspace.join("pnpm-sbom.config.yml"),
        r#"
format: yaml
document:
  name: from-config
"#,
    );

    let output = cargo_bin_cmd!("pnpm-sbom")
        .arg("-p")
        .arg(&workspace)
        .arg("--listing")
        .arg(workspace.join("listing.json"))
        .args(["-f", "json", "--document-name", "from-cli"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let document: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["name"], "from-cli");
}

#[test]
fn test_config_paths_relative_to_config_file() {
    let (_dir, workspace) = create_test_workspace();
    write_config(
        &workspace.join("pnpm-sbom.config.yml"),
        r#"
file_information: true
findings_file: findings.yml
license_text_dirs:
  - licenses
"#,
    );

    let output = cargo_bin_cmd!("pnpm-sbom")
        .arg("-p")
        .arg(&workspace)
        .arg("--listing")
        .arg(workspace.join("listing.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let document: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["files"].as_array().unwrap().len(), 1);
    assert_eq!(
        document["hasExtractedLicensingInfos"][0]["licenseId"],
        "LicenseRef-acme-eula"
    );
}

// ============================================================================
// Warnings and errors
// ============================================================================

#[test]
fn test_unknown_config_field_warns() {
    let (_dir, workspace) = create_test_workspace();
    write_config(
        &workspace.join("pnpm-sbom.config.yml"),
        r#"
format: json
check_cve: true
"#,
    );

    cargo_bin_cmd!("pnpm-sbom")
        .arg("-p")
        .arg(&workspace)
        .arg("--listing")
        .arg(workspace.join("listing.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Unknown config field 'check_cve' will be ignored",
        ));
}

#[test]
fn test_invalid_config_exits_with_application_error() {
    let (_dir, workspace) = create_test_workspace();
    write_config(
        &workspace.join("pnpm-sbom.config.yml"),
        r#"
excludes:
  paths:
    - pattern: ""
"#,
    );

    cargo_bin_cmd!("pnpm-sbom")
        .arg("-p")
        .arg(&workspace)
        .arg("--listing")
        .arg(workspace.join("listing.json"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("must not be empty"));
}

#[test]
fn test_missing_explicit_config_file() {
    let (dir, workspace) = create_test_workspace();

    cargo_bin_cmd!("pnpm-sbom")
        .arg("-p")
        .arg(&workspace)
        .arg("-c")
        .arg(dir.path().join("missing.yml"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to read config file"));
}
