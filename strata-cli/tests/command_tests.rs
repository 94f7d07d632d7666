//! Integration tests for `strata scan` and `strata config`.
//!
//! Runs the command handlers against real directory trees and TOML files.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use strata_cli::cli::{OutputFormat, ScanArgs};
use strata_cli::commands::{config, scan};
use strata_cli::output::OutputWriter;

const CARGO_LOCK: &str = r#"version = 3

[[package]]
name = "app"
version = "0.1.0"
dependencies = ["serde"]

[[package]]
name = "serde"
version = "1.0.197"
source = "registry+https://github.com/rust-lang/crates.io-index"
"#;

const GO_MOD: &str = "module example.com/app\n\ngo 1.21\n\nrequire github.com/x/y v1.2.3\n";

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("has parent")).expect("should create dirs");
    fs::write(path, body).expect("should write file");
}

fn project() -> TempDir {
    let dir = TempDir::new().expect("should create temp dir");
    write(dir.path(), "Cargo.lock", CARGO_LOCK);
    write(dir.path(), "cmd/go.mod", GO_MOD);
    write(dir.path(), "testdata/go.mod", "module fixture\n\nrequire a.com/b v0.1.0\n");
    dir
}

fn scan_args(target: &Path) -> ScanArgs {
    ScanArgs {
        target: target.to_path_buf(),
        catalogers: Vec::new(),
        exclude: Vec::new(),
        layer: Vec::new(),
    }
}

fn missing_config(dir: &TempDir) -> PathBuf {
    dir.path().join("no-such-strata.toml")
}

#[tokio::test]
#[serial]
async fn test_scan_directory_with_default_config() {
    // Given: a project without a strata.toml
    let dir = project();

    // When: scanning it
    let report = scan::run(&scan_args(dir.path()), &missing_config(&dir))
        .await
        .expect("scan should succeed");

    // Then: every lockfile is cataloged and nothing failed
    let names: Vec<&str> = report
        .document
        .artifacts
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names.len(), 4, "{names:?}");
    assert!(names.contains(&"serde"));
    assert!(names.contains(&"github.com/x/y"));
    assert!(report.failures.is_empty());
    assert_eq!(report.document.source.kind, "directory");
}

#[tokio::test]
#[serial]
async fn test_scan_flags_select_and_exclude() {
    let dir = project();
    let mut args = scan_args(dir.path());
    args.catalogers = vec!["go".to_owned()];
    args.exclude = vec!["**/testdata/**".to_owned()];

    let report = scan::run(&args, &missing_config(&dir))
        .await
        .expect("scan should succeed");

    let names: Vec<&str> = report
        .document
        .artifacts
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["github.com/x/y"]);
}

#[tokio::test]
#[serial]
async fn test_scan_config_file_selection() {
    let dir = project();
    let config_path = dir.path().join("strata.toml");
    fs::write(
        &config_path,
        "[catalog]\ncatalogers = [\"rust\"]\n\n[file]\nmetadata = false\ndigests = []\n",
    )
    .expect("should write config");

    let report = scan::run(&scan_args(dir.path()), &config_path)
        .await
        .expect("scan should succeed");

    assert!(
        report
            .document
            .artifacts
            .iter()
            .all(|p| p.package_type == "rust-crate")
    );
    assert!(report.document.files.is_empty());
    assert_eq!(
        report.document.descriptor.configuration["catalogers"],
        serde_json::json!(["rust"])
    );
}

#[tokio::test]
#[serial]
async fn test_scan_json_output_is_the_document() {
    let dir = project();
    let report = scan::run(&scan_args(dir.path()), &missing_config(&dir))
        .await
        .expect("scan should succeed");

    let mut buffer = Vec::new();
    OutputWriter::new(OutputFormat::Json)
        .render_to(&report, &mut buffer)
        .expect("should render");
    let json: serde_json::Value = serde_json::from_slice(&buffer).expect("valid JSON");

    assert!(json["artifacts"].is_array());
    assert!(json["artifactRelationships"].is_array());
    assert_eq!(json["descriptor"]["name"], "strata");
    assert!(json.get("failures").is_none());
}

#[tokio::test]
#[serial]
async fn test_scan_invalid_exclude_is_config_error() {
    let dir = project();
    let mut args = scan_args(dir.path());
    args.exclude = vec!["[oops".to_owned()];

    let err = scan::run(&args, &missing_config(&dir))
        .await
        .expect_err("invalid glob should fail");
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
#[serial]
async fn test_scan_missing_target_fails() {
    let dir = TempDir::new().expect("should create temp dir");
    let err = scan::run(&scan_args(&dir.path().join("nope")), &missing_config(&dir))
        .await
        .expect_err("missing target should fail");
    assert_eq!(err.exit_code(), 10);
}

#[tokio::test]
#[serial]
async fn test_config_validate_valid_toml() {
    // Given: A valid config file
    let dir = TempDir::new().expect("should create temp dir");
    let config_path = dir.path().join("strata.toml");
    fs::write(
        &config_path,
        r#"
[general]
log_level = "debug"
log_format = "json"

[catalog]
catalogers = ["go", "rust"]
exclude = ["**/node_modules/**"]
parallelism = 8
"#,
    )
    .expect("should write config");

    // When: validating
    let report = config::validate(&config_path).await;

    // Then: valid without errors
    assert!(report.valid, "{:?}", report.errors);
    assert!(report.errors.is_empty());
}

#[tokio::test]
#[serial]
async fn test_config_validate_reports_invalid_value() {
    let dir = TempDir::new().expect("should create temp dir");
    let config_path = dir.path().join("strata.toml");
    fs::write(&config_path, "[catalog]\nparallelism = 0\n").expect("should write config");

    let report = config::validate(&config_path).await;

    assert!(!report.valid);
    assert!(report.errors[0].contains("catalog.parallelism"));
}

#[tokio::test]
#[serial]
async fn test_config_validate_missing_file() {
    let dir = TempDir::new().expect("should create temp dir");
    let report = config::validate(&missing_config(&dir)).await;
    assert!(!report.valid, "missing file should be reported");
}

#[tokio::test]
#[serial]
async fn test_config_show_defaults_when_file_missing() {
    let dir = TempDir::new().expect("should create temp dir");
    let report = config::show(&missing_config(&dir), Some("catalog"))
        .await
        .expect("defaults should load");

    assert_eq!(report.config["parallelism"], 4);
    assert!(report.config_toml.contains("parallelism = 4"));
}

#[tokio::test]
#[serial]
async fn test_config_show_applies_env_override() {
    let dir = TempDir::new().expect("should create temp dir");

    // SAFETY: serialized with the other env-reading tests
    unsafe { std::env::set_var("STRATA_CATALOG_PARALLELISM", "16") };
    let report = config::show(&missing_config(&dir), None).await;
    unsafe { std::env::remove_var("STRATA_CATALOG_PARALLELISM") };

    let report = report.expect("config should load");
    assert_eq!(report.config["catalog"]["parallelism"], 16);
}
