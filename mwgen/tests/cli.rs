//! End-to-end tests running the built `mwgen` binary against temp packages.

use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use tempfile::TempDir;

const SERVICE_GO: &str = r#"package orders

import "context"

type Service interface {
	Add(ctx context.Context, item Item) error
	Get(ctx context.Context, id uint) (Item, error)
}

type Item struct {
	ID uint
}
"#;

/// A package directory with a go.mod and the orders service.
fn package() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("go.mod"), "module example.com/orders\n\ngo 1.22\n")
        .expect("Failed to write go.mod");
    fs::write(temp_dir.path().join("service.go"), SERVICE_GO).expect("Failed to write source");
    temp_dir
}

fn mwgen(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mwgen"))
        .args(args)
        .arg("--dir")
        .arg(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run mwgen")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_generate_logging() {
    let dir = package();
    let output = mwgen(dir.path(), &["generate", "-i", "Service", "-a", "logging"]);
    assert_eq!(output.status.code(), Some(0));

    let content = fs::read_to_string(dir.path().join("middleware/log.go")).unwrap();
    assert!(content.starts_with("// Code generated by mwgen; DO NOT EDIT.\n\npackage middleware\n"));
    assert!(content.contains("\t\"example.com/orders\"\n"));
    assert!(content.contains("const DefaultLogServiceName = \"Service\""));
    assert!(content.contains("err := m.next.Add(ctx, item)"));
    assert!(content.contains("res, err := m.next.Get(ctx, id)"));

    let report = stdout(&output);
    assert!(report.contains("Interface: orders.Service"));
    assert!(report.contains("Methods: 2"));
}

#[test]
fn test_generate_is_deterministic() {
    let dir = package();
    let path = dir.path().join("middleware/trace.go");

    let first = mwgen(dir.path(), &["gen", "-i", "Service", "-a", "tracing"]);
    assert_eq!(first.status.code(), Some(0));
    let before = fs::read(&path).unwrap();

    let second = mwgen(dir.path(), &["gen", "-i", "Service", "-a", "tracing"]);
    assert_eq!(second.status.code(), Some(0));
    assert_eq!(fs::read(&path).unwrap(), before);
    assert!(stdout(&second).contains("(unchanged)"));
}

#[test]
fn test_dry_run_prints_unit() {
    let dir = package();
    let output = mwgen(
        dir.path(),
        &["generate", "-i", "Service", "-a", "tracing", "--dry-run"],
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("func (m *traceMiddleware) Get(ctx context.Context, id uint) (orders.Item, error) {"));
    assert!(!dir.path().join("middleware").exists());
}

#[test]
fn test_config_file_is_applied() {
    let dir = package();
    fs::write(
        dir.path().join("mwgen.toml"),
        "output = \"internal/mw\"\nlabel = \"orders\"\n",
    )
    .unwrap();

    let output = mwgen(dir.path(), &["generate", "-i", "Service", "-a", "logging"]);
    assert_eq!(output.status.code(), Some(0));

    let content = fs::read_to_string(dir.path().join("internal/mw/log.go")).unwrap();
    assert!(content.contains("package mw\n"));
    assert!(content.contains("const DefaultLogServiceName = \"orders\""));
}

#[test]
fn test_interface_not_found() {
    let dir = package();
    let output = mwgen(dir.path(), &["generate", "-i", "Missing", "-a", "logging"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing"));
    assert!(!dir.path().join("middleware").exists());
}

#[test]
fn test_parse_failure() {
    let dir = package();
    fs::write(dir.path().join("broken.go"), "package orders\n\ntype Broken interface {\n").unwrap();

    let output = mwgen(dir.path(), &["generate", "-i", "Service", "-a", "logging"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("middleware").exists());
}

#[test]
fn test_invalid_config() {
    let dir = package();
    fs::write(dir.path().join("mwgen.toml"), "colour = \"blue\"\n").unwrap();

    let output = mwgen(dir.path(), &["generate", "-i", "Service", "-a", "logging"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("middleware").exists());
}

#[test]
fn test_usage_errors() {
    let dir = package();
    for args in [
        &["generate", "-i", "", "-a", "logging"][..],
        &["generate", "-i", "Service", "-a", "metrics"][..],
        &["generate", "-i", "Service", "-a", "log"][..],
        &["generate", "-i", "Service", "-a", "Tracing"][..],
        &["generate", "-i", "Service", "-a", ""][..],
        &["generate", "-a", "logging"][..],
    ] {
        let output = mwgen(dir.path(), args);
        assert_eq!(output.status.code(), Some(2), "args: {:?}", args);
    }
    assert!(!dir.path().join("middleware").exists());
}

#[test]
fn test_list_json() {
    let dir = package();
    let output = mwgen(dir.path(), &["list", "--json"]);
    assert_eq!(output.status.code(), Some(0));

    let interfaces: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = interfaces
        .as_array()
        .unwrap()
        .iter()
        .map(|iface| iface["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Service"]);
    assert_eq!(interfaces[0]["import_path"], "example.com/orders");
}

#[test]
fn test_list_text() {
    let dir = package();
    let output = mwgen(dir.path(), &["list"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("  - Add(ctx context.Context, item Item) error"));
}

#[test]
fn test_hand_written_file_is_kept() {
    let dir = package();
    let path = dir.path().join("middleware/log.go");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "package middleware\n").unwrap();

    let output = mwgen(dir.path(), &["generate", "-i", "Service", "-a", "logging"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(fs::read_to_string(&path).unwrap(), "package middleware\n");
}
