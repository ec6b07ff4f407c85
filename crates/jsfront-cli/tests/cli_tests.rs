//! End-to-end runs of the `jsfront` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn run(args: &[&str], file: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jsfront"))
        .env_remove("JSFRONT_LOG")
        .env_remove("RUST_LOG")
        .args(args)
        .arg("--no-color")
        .arg(file)
        .output()
        .unwrap()
}

#[test]
fn test_clean_script_exits_zero() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_source(temp_dir.path(), "ok.js", "var a = 1;\nfunction f() { return a; }\n");
    let output = run(&[], &file);
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
}

#[test]
fn test_syntax_error_is_reported_with_location() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_source(temp_dir.path(), "bad.js", "let a;\nlet a;\n");
    let output = run(&[], &file);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.js:2:5 - error JS"), "{stderr}");
    assert!(stderr.contains("  Related: "), "{stderr}");
}

#[test]
fn test_module_goal() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_source(temp_dir.path(), "lib.mjs", "import a from 'm';\nexport { a };\n");
    assert!(run(&["--goal", "module"], &file).status.success());
    assert_eq!(run(&[], &file).status.code(), Some(1));
}

#[test]
fn test_dump_bindings_is_json() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_source(temp_dir.path(), "scopes.js", "var a; let b;");
    let output = run(&["--dump", "bindings"], &file);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = value["scopes"][0]["names"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|binding| binding["name"].as_str())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_config_file_sets_options() {
    let temp_dir = TempDir::new().unwrap();
    let file = write_source(temp_dir.path(), "fold.js", "1 + 2;");
    let config = write_source(temp_dir.path(), "options.json", r#"{ "foldConstants": true }"#);
    let output = run(&["--config", config.to_str().unwrap(), "--dump", "ast"], &file);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Number "), "{stdout}");
    assert!(!stdout.contains("Add "), "{stdout}");
}

#[test]
fn test_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&[], &temp_dir.path().join("absent.js"));
    assert!(!output.status.success());
}
