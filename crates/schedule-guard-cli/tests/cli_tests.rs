//! Integration tests for the `schedguard` CLI binary.
//!
//! These use `assert_cmd` and `predicates` to run the check, save and audit
//! subcommands through the actual binary, covering stdin piping, file I/O,
//! exit codes and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Path to a file under `tests/fixtures/`.
macro_rules! fixture {
    ($name:literal) => {
        concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/", $name)
    };
}

fn read_fixture(path: &str) -> String {
    std::fs::read_to_string(path).expect("fixture must exist")
}

fn schedguard() -> Command {
    Command::cargo_bin("schedguard").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_reports_first_conflict_with_exit_code_2() {
    let output = schedguard()
        .args(["check", "-c", fixture!("candidate.json"), "-e", fixture!("course.json")])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already booked"))
        .get_output()
        .stdout
        .clone();

    let verdict: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        verdict,
        serde_json::json!({"status": "conflict", "with": "S2", "reason": "RoomConflict"})
    );
}

#[test]
fn check_reads_candidate_from_stdin() {
    schedguard()
        .args(["check", "-e", fixture!("course.json")])
        .write_stdin(read_fixture(fixture!("candidate_free.json")))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status":"noConflict""#));
}

#[test]
fn check_all_lists_every_clash() {
    let output = schedguard()
        .args([
            "check",
            "--all",
            "-c",
            fixture!("candidate.json"),
            "-e",
            fixture!("course.json"),
        ])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();

    let details: Value = serde_json::from_slice(&output).unwrap();
    let details = details.as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["with"], "S2");
    assert_eq!(details[0]["overlapMinutes"], 30);
    assert_eq!(details[1]["with"], "S3");
    assert_eq!(details[1]["reason"], "TeacherConflict");
    assert_eq!(details[1]["sharedDays"], serde_json::json!(["Monday"]));
}

#[test]
fn check_invalid_candidate_fails() {
    schedguard()
        .args([
            "check",
            "-c",
            fixture!("candidate_invalid.json"),
            "-e",
            fixture!("course.json"),
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid assignment"));
}

#[test]
fn check_malformed_json_fails() {
    schedguard()
        .args(["check", "-e", fixture!("course.json")])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid candidate assignment JSON"));
}

#[test]
fn check_missing_file_fails() {
    schedguard()
        .args(["check", "-c", "/nonexistent/candidate.json", "-e", fixture!("course.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// save
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn save_writes_updated_documents() {
    let output_path = std::env::temp_dir()
        .join(format!("schedguard-test-save-output-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&output_path);

    schedguard()
        .args([
            "save",
            "-c",
            fixture!("candidate_free.json"),
            "-e",
            fixture!("course.json"),
            "-o",
            output_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let written = std::fs::read_to_string(&output_path).expect("output file must exist");
    let docs: Value = serde_json::from_str(&written).unwrap();
    let ids: Vec<&str> = docs
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["subjectId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["S2", "S3", "S1"]);

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn save_rejects_conflicting_candidate() {
    schedguard()
        .args(["save", "-c", fixture!("candidate.json"), "-e", fixture!("course.json")])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("RoomConflict"))
        .stdout(predicate::str::contains("subjectId").not());
}

// ─────────────────────────────────────────────────────────────────────────────
// audit
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn audit_reports_double_bookings_per_course() {
    let output = schedguard()
        .args(["audit", "-i", fixture!("schedules.json")])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("BSIT: 1 double-booking(s)"))
        .get_output()
        .stdout
        .clone();

    let report: Value = serde_json::from_slice(&output).unwrap();
    let bsit = &report["courses"]["BSIT"]["doubleBookings"];
    assert_eq!(bsit.as_array().unwrap().len(), 1);
    assert_eq!(bsit[0]["first"], "IT1");
    assert_eq!(bsit[0]["second"], "IT2");
    assert_eq!(bsit[0]["overlapMinutes"], 60);
    assert!(report["courses"]["BSED"]["doubleBookings"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[test]
fn audit_clean_course_from_stdin_succeeds() {
    schedguard()
        .arg("audit")
        .write_stdin(read_fixture(fixture!("course.json")))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""doubleBookings": []"#));
}

#[test]
fn no_subcommand_shows_usage() {
    schedguard()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
