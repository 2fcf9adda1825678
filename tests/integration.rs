use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_vexfile")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

// -- stdin mode --

#[test]
fn stdin_mode_prints_the_normalized_document() {
    let input = std::fs::read_to_string(fixture_path("n14c3.vex")).unwrap();
    let expected = std::fs::read_to_string(fixture_path("n14c3.expected.vex")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn stdin_mode_reports_parse_errors_with_line_numbers() {
    cmd()
        .write_stdin("$SCHED;\nscan a;\nscan b;\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nesting error at line 3"));
}

#[test]
fn stdin_mode_rejects_malformed_entries() {
    cmd()
        .write_stdin("no equals sign here;\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("grammar error at line 1"));
}

// -- file mode --

#[test]
fn file_mode_prints_to_stdout() {
    let expected = std::fs::read_to_string(fixture_path("n14c3.expected.vex")).unwrap();

    let assert = cmd().arg(fixture_path("n14c3.vex")).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn file_mode_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("n14c3.norm.vex");

    cmd()
        .arg(fixture_path("n14c3.vex"))
        .args(["-o", out.to_str().unwrap()])
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    let expected = std::fs::read_to_string(fixture_path("n14c3.expected.vex")).unwrap();
    assert_eq!(written, expected);
}

#[test]
fn missing_input_file_fails() {
    cmd()
        .arg(fixture_path("does-not-exist.vex"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}

// -- overwrite guard --

#[test]
fn refuses_to_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.vex");
    std::fs::write(&out, "VEX_rev = 1.5;\n").unwrap();

    cmd()
        .arg(fixture_path("n14c3.vex"))
        .args(["-o", out.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    // Untouched.
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "VEX_rev = 1.5;\n");
}

#[test]
fn force_overwrites_the_destination() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.vex");
    std::fs::write(&out, "stale\n").unwrap();

    cmd()
        .arg(fixture_path("n14c3.vex"))
        .args(["-o", out.to_str().unwrap(), "--force"])
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    let expected = std::fs::read_to_string(fixture_path("n14c3.expected.vex")).unwrap();
    assert_eq!(written, expected);
}
