//! Corruption recovery tests for the setdeck binary.
//!
//! These tests verify the system can handle:
//! - Corrupted exercise and deck files
//! - Files with the wrong shape
//! - Deck entries pointing at deleted exercises
//! - A broken config file

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::create_dir_all(temp_dir.path().join("data")).unwrap();
    temp_dir
}

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("setdeck"));
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

#[test]
fn test_corrupted_exercises_fall_back_to_seed() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("data/exercises.json"), "{ invalid json }}}}")
        .expect("Failed to write corrupted exercises");

    cli(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Deadlift"));
}

#[test]
fn test_corrupted_deck_falls_back_to_catalog_order() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("data/exercises.json"),
        r#"[{"id":"row","name":"Row"},{"id":"dip","name":"Dip","muscle":"Triceps"}]"#,
    )
    .unwrap();
    fs::write(temp_dir.path().join("data/deck.json"), "[\"row\", ").unwrap();

    cli(temp_dir.path())
        .arg("skip")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped row"))
        .stdout(predicate::str::contains("Triceps"));

    let deck = fs::read_to_string(temp_dir.path().join("data/deck.json")).unwrap();
    assert_eq!(deck, r#"["dip","row"]"#);
}

#[test]
fn test_wrong_shape_is_treated_as_missing() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("data/deck.json"), r#"{"deck":["deadlift"]}"#).unwrap();

    cli(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("▶ #1"));
}

#[test]
fn test_deck_ids_without_exercise_are_dropped() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("data/exercises.json"),
        r#"[{"id":"row","name":"Row","history":[]}]"#,
    )
    .unwrap();
    fs::write(temp_dir.path().join("data/deck.json"), r#"["ghost","row"]"#).unwrap();

    cli(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Row"));

    cli(temp_dir.path()).arg("skip").assert().success();
    let deck = fs::read_to_string(temp_dir.path().join("data/deck.json")).unwrap();
    assert_eq!(deck, r#"["row"]"#);
}

#[test]
fn test_history_written_by_older_versions_is_readable() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("data/exercises.json"),
        r#"[{"id":"row","name":"Row","history":[{"date":"2024-03-01T08:00:00Z","reps":12}]}]"#,
    )
    .unwrap();

    cli(temp_dir.path())
        .args(["history", "row"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12 reps"));
}

#[test]
fn test_broken_config_is_reported() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config/setdeck");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[deck\nskip_offset = ").unwrap();

    cli(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Toml"));
}

#[test]
fn test_config_skip_offset_is_honoured() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config/setdeck");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[deck]\nskip_offset = 1\n").unwrap();

    cli(temp_dir.path()).arg("skip").assert().success();

    let deck = fs::read_to_string(temp_dir.path().join("data/deck.json")).unwrap();
    assert_eq!(deck, r#"["back-squat","deadlift","bench-press"]"#);
}
