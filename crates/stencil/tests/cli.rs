//! End-to-end tests for the stencil binary.

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "STENCIL_INPUT",
    "STENCIL_OUTPUT",
    "STENCIL_VALUES",
    "STENCIL_UNDEFINED",
    "STENCIL_INCLUDE_DIR",
    "STENCIL_LOG",
];

/// A stencil invocation with a clean environment.
fn stencil() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_stencil"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

#[test]
fn test_renders_with_legacy_flags() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "greeting.txt", "Hello {{ name }}");
    let values = write(dir.path(), "values.yaml", "name: World\n");
    let output = dir.path().join("out.txt");

    stencil()
        .arg("-input")
        .arg(&input)
        .arg("-output")
        .arg(&output)
        .arg("-values")
        .arg(&values)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(&output).unwrap(), "Hello World");
}

#[test]
fn test_renders_with_double_dash_flags() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "list.txt", "{% for i in items %}- {{ i }}\n{% endfor %}");
    let values = write(dir.path(), "values.yaml", "items: [a, b]\n");
    let output = dir.path().join("out.txt");

    stencil()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--values")
        .arg(&values)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&output).unwrap(), "- a\n- b\n");
}

#[test]
fn test_flags_from_environment() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "t.txt", "{{ n }}");
    let values = write(dir.path(), "values.yaml", "n: 7\n");
    let output = dir.path().join("out.txt");

    stencil()
        .env("STENCIL_INPUT", &input)
        .env("STENCIL_OUTPUT", &output)
        .env("STENCIL_VALUES", &values)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&output).unwrap(), "7");
}

#[test]
fn test_missing_flag_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "t.txt", "x");
    let output = dir.path().join("out.txt");

    stencil()
        .arg("-input")
        .arg(&input)
        .arg("-output")
        .arg(&output)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--values"));

    assert!(!output.exists());
}

#[test]
fn test_empty_flag_fails() {
    let dir = TempDir::new().unwrap();
    let values = write(dir.path(), "values.yaml", "");

    stencil()
        .args(["-input", "", "-output"])
        .arg(dir.path().join("out.txt"))
        .arg("-values")
        .arg(&values)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("must not be empty"));
}

#[test]
fn test_invalid_template_fails_before_output() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "t.txt", "{{ unclosed");
    let values = write(dir.path(), "values.yaml", "a: 1\n");
    let output = write(dir.path(), "out.txt", "previous");

    stencil()
        .arg("-input")
        .arg(&input)
        .arg("-output")
        .arg(&output)
        .arg("-values")
        .arg(&values)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("parsing template"));

    assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
}

#[test]
fn test_error_prefix_is_plain_when_stderr_is_piped() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "t.txt", "{{ unclosed");
    let values = write(dir.path(), "values.yaml", "a: 1\n");
    let output = dir.path().join("out.txt");

    stencil()
        .env_remove("CLICOLOR_FORCE")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--values")
        .arg(&values)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: "))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn test_invalid_values_fails_before_output() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "t.txt", "{{ a }}");
    let values = write(dir.path(), "values.yaml", "a: [unclosed\n");
    let output = dir.path().join("out.txt");

    stencil()
        .arg("-input")
        .arg(&input)
        .arg("-output")
        .arg(&output)
        .arg("-values")
        .arg(&values)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("processing values"));

    assert!(!output.exists());
}

#[test]
fn test_missing_values_file_names_path() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "t.txt", "{{ a }}");
    let output = dir.path().join("out.txt");

    stencil()
        .arg("-input")
        .arg(&input)
        .arg("-output")
        .arg(&output)
        .arg("-values")
        .arg(dir.path().join("absent.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("reading values"))
        .stderr(predicate::str::contains("absent.yaml"));
}

#[test]
fn test_strict_render_failure_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "t.txt", "{{ missing }}");
    let values = write(dir.path(), "values.yaml", "present: 1\n");
    let output = dir.path().join("out.txt");

    stencil()
        .arg("-input")
        .arg(&input)
        .arg("-output")
        .arg(&output)
        .arg("-values")
        .arg(&values)
        .arg("--undefined=strict")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("rendering"));
}

#[test]
fn test_lenient_missing_value_renders_empty() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "t.txt", "[{{ missing }}]");
    let values = write(dir.path(), "values.yaml", "");
    let output = dir.path().join("out.txt");

    stencil()
        .arg("-input")
        .arg(&input)
        .arg("-output")
        .arg(&output)
        .arg("-values")
        .arg(&values)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&output).unwrap(), "[]");
}

#[test]
fn test_second_run_overwrites() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "t.txt", "line\n");
    let values = write(dir.path(), "values.yaml", "");
    let output = write(dir.path(), "out.txt", "much longer stale content\n");

    for _ in 0..2 {
        stencil()
            .arg("-input")
            .arg(&input)
            .arg("-output")
            .arg(&output)
            .arg("-values")
            .arg(&values)
            .assert()
            .success();
    }

    assert_eq!(fs::read_to_string(&output).unwrap(), "line\n");
}

#[test]
fn test_help_lists_flags() {
    stencil()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--input"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--values"));
}
