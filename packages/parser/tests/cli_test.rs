//! Tests for the command-line interface.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn parser() -> Command {
    Command::cargo_bin("legcowatch-parser").unwrap()
}

#[test]
fn test_agenda_command_writes_yaml() {
    let out = tempdir().unwrap();

    parser()
        .arg("agenda")
        .arg(fixture_path("council_agenda-20131009-e.html"))
        .arg("--output")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("council_agenda-20131009-e"))
        .stdout(predicate::str::contains("Questions: 2"));

    let yaml = fs::read_to_string(out.path().join("council_agenda-20131009-e.yaml")).unwrap();
    assert!(yaml.starts_with("---\n"));
    assert!(yaml.contains("language: english"));
}

#[test]
fn test_agenda_command_with_explicit_uid() {
    let out = tempdir().unwrap();
    let input = out.path().join("agenda.html");
    fs::copy(fixture_path("council_agenda-20131009-c.html"), &input).unwrap();

    parser()
        .args(["agenda", "--uid", "council_agenda-20131009-c", "-o"])
        .arg(out.path())
        .arg(&input)
        .assert()
        .success();

    assert!(out.path().join("council_agenda-20131009-c.yaml").exists());
}

#[test]
fn test_agenda_command_rejects_bad_uid() {
    parser()
        .args(["agenda", "--uid", "council_agenda-20131009"])
        .arg(fixture_path("council_agenda-20131009-e.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid document uid"));
}

#[test]
fn test_agenda_command_missing_output_dir() {
    parser()
        .arg("agenda")
        .arg(fixture_path("council_agenda-20131009-e.html"))
        .args(["--output", "/nonexistent/output/dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Output directory does not exist"));
}

#[test]
fn test_question_command() {
    let out = tempdir().unwrap();

    parser()
        .arg("question")
        .arg(fixture_path("question-20131009-5-e.htm"))
        .args(["--uid", "question-20131009-5-e", "--date", "9.10.2013"])
        .arg("--output")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Subsidies for elderly persons"));

    let yaml = fs::read_to_string(out.path().join("question-20131009-5-e.yaml")).unwrap();
    assert!(yaml.contains("is_oral: true"));
    assert!(yaml.contains("asker: Chan Kin-por"));
}

#[test]
fn test_question_command_big5() {
    let out = tempdir().unwrap();

    parser()
        .arg("question")
        .arg(fixture_path("question-20131009-5-c.htm"))
        .args(["--uid", "question-20131009-5-c", "--date", "9.10.2013"])
        .args(["--encoding", "hkscs"])
        .arg("--output")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("長者津貼"));

    let yaml = fs::read_to_string(out.path().join("question-20131009-5-c.yaml")).unwrap();
    assert!(yaml.contains("asker: 陳健波"));
}

#[test]
fn test_question_command_rejects_unknown_encoding() {
    parser()
        .arg("question")
        .arg(fixture_path("question-20131009-5-c.htm"))
        .args(["--uid", "question-20131009-5-c", "--date", "9.10.2013"])
        .args(["--encoding", "klingon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported character encoding"));
}

#[test]
fn test_question_command_rejects_bad_date() {
    parser()
        .arg("question")
        .arg(fixture_path("question-20131009-5-e.htm"))
        .args(["--uid", "question-20131009-5-e", "--date", "2013-10-09"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_batch_command_reports_failures() {
    let input = tempdir().unwrap();
    let out = tempdir().unwrap();
    fs::copy(
        fixture_path("council_agenda-20131009-e.html"),
        input.path().join("council_agenda-20131009-e.html"),
    )
    .unwrap();
    fs::write(
        input.path().join("council_agenda-20131016-e.html"),
        "<script>only script</script>",
    )
    .unwrap();
    fs::write(input.path().join("notes.txt"), "ignored").unwrap();

    parser()
        .arg("batch")
        .arg(input.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed: 1"))
        .stdout(predicate::str::contains("Failed: 1"))
        .stdout(predicate::str::contains("council_agenda-20131016-e"));

    assert!(out.path().join("council_agenda-20131009-e.yaml").exists());
    assert!(!out.path().join("council_agenda-20131016-e.yaml").exists());
}
