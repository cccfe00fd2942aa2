use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::{tempdir, TempDir};

fn write_pair(old: &str, new: &str) -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().expect("temp dir");
    let old_path = dir.path().join("old.csv");
    let new_path = dir.path().join("new.csv");
    fs::write(&old_path, old).expect("write old csv");
    fs::write(&new_path, new).expect("write new csv");
    (dir, old_path, new_path)
}

fn tabcompare() -> Command {
    let mut cmd = Command::cargo_bin("tabcompare").expect("binary exists");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn identical_files_exit_zero() {
    let (_dir, old, new) = write_pair("id,name\n1,John\n", "id,name\n1,John\n");
    tabcompare()
        .args([old.to_str().unwrap(), new.to_str().unwrap(), "--key", "id"])
        .assert()
        .code(0)
        .stdout(contains("No differences found."));
}

#[test]
fn modified_value_exits_one() {
    let (_dir, old, new) = write_pair("id,name,value\n1,John,100\n", "id,name,value\n1,John,150\n");
    tabcompare()
        .args([old.to_str().unwrap(), new.to_str().unwrap(), "-k", "id", "--no-color"])
        .assert()
        .code(1)
        .stdout(contains("~1 modified"))
        .stdout(contains("value: \"100\" → \"150\""));
}

#[test]
fn json_output_lists_row_diffs() {
    let (_dir, old, new) = write_pair("id,name\n1,John\n", "id,name\n3,Bob\n");
    let output = tabcompare()
        .args([
            old.to_str().unwrap(),
            new.to_str().unwrap(),
            "-k",
            "id",
            "--ignore-duplicates",
            "--format",
            "json",
        ])
        .output()
        .expect("run tabcompare");

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(value["removed_rows"][0]["key_values"], serde_json::json!(["1"]));
    assert_eq!(value["added_rows"][0]["key_values"], serde_json::json!(["3"]));
    assert_eq!(value["stats"]["rows_added"], 1);
}

#[test]
fn unknown_key_column_is_an_error() {
    let (_dir, old, new) = write_pair("id,name\n1,John\n", "id,name\n1,John\n");
    tabcompare()
        .args([old.to_str().unwrap(), new.to_str().unwrap(), "-k", "nope"])
        .assert()
        .code(2)
        .stderr(contains("key column 'nope' not found in old dataset"));
}

#[test]
fn empty_file_is_an_error() {
    let (_dir, old, new) = write_pair("", "id\n1\n");
    tabcompare()
        .args([old.to_str().unwrap(), new.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(contains("old dataset is empty"));
}

#[test]
fn unreadable_input_reports_no_differences_by_default() {
    let dir = tempdir().expect("temp dir");
    let old = dir.path().join("old.json");
    let new = dir.path().join("new.json");
    fs::write(&old, "[{\"id\": 1}").expect("write old json");
    fs::write(&new, "[{\"id\": 2}]").expect("write new json");

    tabcompare()
        .args([old.to_str().unwrap(), new.to_str().unwrap()])
        .assert()
        .code(0)
        .stdout(contains("No differences found."))
        .stderr(contains("failed to load old input"));

    tabcompare()
        .args([old.to_str().unwrap(), new.to_str().unwrap(), "--strict-errors"])
        .assert()
        .code(2)
        .stderr(contains("failed to load old input"));
}

#[test]
fn strict_order_and_stats_only() {
    let (_dir, old, new) = write_pair(
        "id,name\n1,John\n2,Jane\n",
        "id,name\n1,John\n2,Jane\n3,Bob\n",
    );
    tabcompare()
        .args([
            old.to_str().unwrap(),
            new.to_str().unwrap(),
            "--strict-order",
            "--stats-only",
        ])
        .assert()
        .code(1)
        .stdout(contains("Added:     1"))
        .stdout(contains("Modified:  0"))
        .stdout(contains("Removed:   0"));
}

#[test]
fn duplicate_count_mismatch_is_reported() {
    let (_dir, old, new) = write_pair("id,name\n1,John\n1,John\n", "id,name\n1,John\n");
    tabcompare()
        .args([old.to_str().unwrap(), new.to_str().unwrap(), "--no-color"])
        .assert()
        .code(1)
        .stdout(contains("occurs 2 time(s) in old, 1 time(s) in new"));
}
