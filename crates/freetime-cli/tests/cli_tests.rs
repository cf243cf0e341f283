//! Integration tests for the `freetime` CLI binary.
//!
//! These use `assert_cmd` and `predicates` to run the actual binary against the
//! snapshot fixture, covering grid rendering, week labels, and the commands
//! that write the snapshot back.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Helper: path to the snapshot fixture.
fn snapshot_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/snapshot.json")
}

/// Helper: copy the fixture into a temp dir so commands can write to it.
fn scratch_snapshot() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("snapshot.json");
    std::fs::copy(snapshot_path(), &path).expect("copy fixture");
    (dir, path.to_string_lossy().into_owned())
}

/// Helper: run `grid` for Monday's 8-10 AM rows as JSON and return Monday's classes.
fn monday_json(extra: &[&str]) -> Vec<String> {
    let mut args = vec![
        "grid", "-i", snapshot_path(), "--user", "me", "--week", "2026-03-16",
        "--start-hour", "8", "--end-hour", "10", "--format", "json",
    ];
    args.extend_from_slice(extra);

    let output = Command::cargo_bin("freetime")
        .unwrap()
        .args(&args)
        .output()
        .expect("run freetime");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let cells = value["grid"]["cells"].as_array().expect("cells array");
    assert_eq!(cells.len(), 21);
    cells
        .iter()
        .filter(|c| c["day"] == 1)
        .map(|c| c["classification"].as_str().unwrap().to_string())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// grid
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn grid_text_shows_label_headers_and_legend() {
    Command::cargo_bin("freetime")
        .unwrap()
        .args(["grid", "-i", snapshot_path(), "--user", "me", "--week", "2026-03-16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mar 15 - 21, 2026"))
        .stdout(predicate::str::contains("Mon 3/16"))
        .stdout(predicate::str::contains("10 PM"))
        .stdout(predicate::str::contains("Common Free Time"))
        .stdout(predicate::str::contains("compared with 1 schedule"));
}

#[test]
fn grid_json_against_friends() {
    assert_eq!(monday_json(&[]), ["common-free", "busy", "common-free"]);
}

#[test]
fn grid_json_against_group() {
    assert_eq!(
        monday_json(&["--group", "study"]),
        ["common-free", "busy", "available"]
    );
}

#[test]
fn grid_lists_free_spans_on_request() {
    Command::cargo_bin("freetime")
        .unwrap()
        .args([
            "grid", "-i", snapshot_path(), "--user", "me", "--week", "2026-03-16",
            "--start-hour", "8", "--end-hour", "10", "--group", "study", "--spans",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mon 3/16  08:00 - 09:00  (60 min)"));
}

#[test]
fn grid_rejects_empty_hour_range() {
    Command::cargo_bin("freetime")
        .unwrap()
        .args([
            "grid", "-i", snapshot_path(), "--user", "me",
            "--start-hour", "9", "--end-hour", "9",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid hour range"));
}

#[test]
fn grid_rejects_unknown_group() {
    Command::cargo_bin("freetime")
        .unwrap()
        .args(["grid", "-i", snapshot_path(), "--user", "me", "--group", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown group"));
}

#[test]
fn grid_missing_snapshot_fails() {
    Command::cargo_bin("freetime")
        .unwrap()
        .args(["grid", "-i", "/nonexistent/snapshot.json", "--user", "me"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read snapshot"));
}

// ─────────────────────────────────────────────────────────────────────────────
// week
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn week_label_with_negative_offset() {
    Command::cargo_bin("freetime")
        .unwrap()
        .args(["week", "--week", "2026-01-07", "--offset", "-1"])
        .assert()
        .success()
        .stdout("Dec 28, 2025 - Jan 3, 2026\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// add / delete / toggle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn add_weekly_then_delete_series() {
    let (_dir, path) = scratch_snapshot();

    let output = Command::cargo_bin("freetime")
        .unwrap()
        .args([
            "add", "-i", &path, "--user", "me", "--title", "Gym",
            "--date", "2026-03-17", "--start", "18:00", "--end", "19:30",
            "--repeat", "weekly",
        ])
        .output()
        .expect("run freetime");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("New event added: Gym"));

    let ids: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(ids.len(), 9);

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["schedules"]["me"].as_array().unwrap().len(), 10);

    Command::cargo_bin("freetime")
        .unwrap()
        .args(["delete", "-i", &path, "--user", "me", "--id", &ids[4], "--series"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 9 interval(s)"));

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["schedules"]["me"].as_array().unwrap().len(), 1);
}

#[test]
fn add_rejects_end_before_start() {
    let (_dir, path) = scratch_snapshot();

    Command::cargo_bin("freetime")
        .unwrap()
        .args([
            "add", "-i", &path, "--user", "me", "--title", "Oops",
            "--date", "2026-03-17", "--start", "10:00", "--end", "09:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("End time must be after start time"));
}

#[test]
fn toggle_busy_hour_frees_it() {
    let (_dir, path) = scratch_snapshot();

    Command::cargo_bin("freetime")
        .unwrap()
        .args(["toggle", "-i", &path, "--user", "me", "--date", "2026-03-16", "--hour", "9"])
        .assert()
        .success()
        .stdout("Marked free: me-lecture\n");

    Command::cargo_bin("freetime")
        .unwrap()
        .args(["toggle", "-i", &path, "--user", "me", "--date", "2026-03-16", "--hour", "9"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Marked busy: "));
}

#[test]
fn output_flag_leaves_input_untouched() {
    let (dir, path) = scratch_snapshot();
    let out = dir.path().join("out.json");
    let before = std::fs::read_to_string(&path).unwrap();

    Command::cargo_bin("freetime")
        .unwrap()
        .args([
            "toggle", "-i", &path, "-o", out.to_str().unwrap(),
            "--user", "me", "--date", "2026-03-18", "--hour", "14",
        ])
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(saved["schedules"]["me"].as_array().unwrap().len(), 2);
}

#[test]
fn week_offset_past_calendar_range_fails_cleanly() {
    Command::cargo_bin("freetime")
        .unwrap()
        .args(["week", "--week", "2026-01-07", "--offset", "2147483647"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"))
        .stderr(predicate::str::contains("panicked").not());
}
