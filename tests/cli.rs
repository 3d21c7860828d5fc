use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_input(dir: &TempDir, source: &str) -> std::path::PathBuf {
    let path = dir.path().join("input.js");
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn test_print_roundtrip() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "a;b;");
    Command::cargo_bin("jsrewrite-rs")
        .unwrap()
        .arg("print")
        .arg(&input)
        .assert()
        .success()
        .stdout("a;\nb;\n");
}

#[test]
fn test_print_json() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "a;");
    Command::cargo_bin("jsrewrite-rs")
        .unwrap()
        .args(["print", "--format", "json"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"Program\""));
}

#[test]
fn test_replace_with_expression() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "foo(a);");
    Command::cargo_bin("jsrewrite-rs")
        .unwrap()
        .arg("replace")
        .arg(&input)
        .args(["--path", "body.0.expression.arguments.0", "--with", "b + c"])
        .assert()
        .success()
        .stdout("foo(b + c);\n");
}

#[test]
fn test_replace_with_statements_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "x = y;");
    let output = dir.path().join("out.js");
    Command::cargo_bin("jsrewrite-rs")
        .unwrap()
        .arg("replace")
        .arg(&input)
        .args(["-p", "body.0.expression.right", "--statements", "var a = 1; a;"])
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("var a;\n"));
    assert!(written.contains("return a;"));
}

#[test]
fn test_replace_inline() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "a; b;");
    Command::cargo_bin("jsrewrite-rs")
        .unwrap()
        .arg("replace")
        .arg(&input)
        .args(["-p", "body.0", "--inline", "x; y;"])
        .assert()
        .success()
        .stdout("x;\ny;\nb;\n");
}

#[test]
fn test_replace_requires_an_edit() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "a;");
    Command::cargo_bin("jsrewrite-rs")
        .unwrap()
        .arg("replace")
        .arg(&input)
        .args(["-p", "body.0"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_source_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "foo(a);");
    Command::cargo_bin("jsrewrite-rs")
        .unwrap()
        .arg("replace")
        .arg(&input)
        .args(["-p", "body.0.expression.arguments.0", "--with", "a +"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("make sure this is an expression"));
}

#[test]
fn test_missing_input_fails() {
    Command::cargo_bin("jsrewrite-rs")
        .unwrap()
        .args(["print", "does-not-exist.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}
