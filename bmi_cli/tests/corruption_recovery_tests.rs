//! Corruption recovery tests for bmi_cli.
//!
//! These tests verify the system can handle:
//! - Corrupted history files
//! - Empty history files
//! - Missing data directories

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("bmifit"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn calc(data_dir: &std::path::Path) -> assert_cmd::assert::Assert {
    cli()
        .arg("calc")
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--name", "Sam", "--system", "metric", "--height-unit", "cm"])
        .args(["--height", "170", "--weight", "65"])
        .assert()
}

#[test]
fn test_corrupted_bmi_history_is_moved_aside() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let history_path = data_dir.join("bmi_history.json");
    fs::write(&history_path, "{ invalid json }}}}").expect("Failed to write corrupted history");

    calc(&data_dir).success();

    // Fresh history holds the new record, the broken file is preserved
    let contents = fs::read_to_string(&history_path).unwrap();
    let history: Vec<serde_json::Value> = serde_json::from_str(&contents).unwrap();
    assert_eq!(history.len(), 1);

    let aside = data_dir.join("bmi_history.json.corrupt");
    assert_eq!(fs::read_to_string(aside).unwrap(), "{ invalid json }}}}");
}

#[test]
fn test_corrupted_workout_history_reads_as_empty() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    fs::write(data_dir.join("workout_history.json"), "[{\"id\": ")
        .expect("Failed to write partial history");

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No history yet."));
}

#[test]
fn test_empty_history_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    fs::write(data_dir.join("bmi_history.json"), "").unwrap();

    calc(&data_dir).success();

    let contents = fs::read_to_string(data_dir.join("bmi_history.json")).unwrap();
    let history: Vec<serde_json::Value> = serde_json::from_str(&contents).unwrap();
    assert_eq!(history.len(), 1);
}

#[test]
fn test_missing_data_dir_is_created() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("nested").join("data");

    calc(&data_dir).success();

    assert!(data_dir.join("bmi_history.json").exists());
}
