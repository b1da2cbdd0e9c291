//! Smoke tests for the deskkit binary

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command for the deskkit binary writing state under `dir`
fn deskkit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("deskkit").expect("deskkit binary should exist");
    cmd.env_remove("RUST_LOG")
        .env_remove("DESKKIT_CONFIG")
        .args(["--color", "never", "--data-dir"])
        .arg(dir.path());
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    deskkit(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("calc"))
        .stdout(predicate::str::contains("stopwatch"));
}

#[test]
fn test_no_subcommand_fails() {
    let dir = TempDir::new().unwrap();
    deskkit(&dir).assert().failure();
}

// ============================================================================
// Calculator
// ============================================================================

#[test]
fn test_calc_chained_evaluation() {
    let dir = TempDir::new().unwrap();
    deskkit(&dir)
        .args(["calc", "5+3*2="])
        .assert()
        .success()
        .stdout(predicate::str::contains("16"))
        .stdout(predicate::str::contains("8 × 2 = 16"))
        .stdout(predicate::str::contains("5 + 3 = 8"));
}

#[test]
fn test_calc_divide_by_zero_shows_error() {
    let dir = TempDir::new().unwrap();
    deskkit(&dir)
        .args(["-q", "calc", "5/0="])
        .assert()
        .success()
        .stdout("Error\n");
}

#[test]
fn test_calc_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    deskkit(&dir)
        .args(["calc", "2^3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown key"));
}

#[test]
fn test_history_persists_between_runs() {
    let dir = TempDir::new().unwrap();
    deskkit(&dir).args(["calc", "6/4="]).assert().success();
    deskkit(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("6 ÷ 4 = 1.5"));

    deskkit(&dir).args(["history", "--clear"]).assert().success();
    deskkit(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No calculations yet"));
}

// ============================================================================
// Themes, clock and configuration
// ============================================================================

#[test]
fn test_theme_toggle_persists() {
    let dir = TempDir::new().unwrap();
    deskkit(&dir)
        .args(["theme", "--toggle"])
        .assert()
        .success()
        .stdout("calculator theme: dark\n");
    deskkit(&dir)
        .args(["theme"])
        .assert()
        .success()
        .stdout("calculator theme: dark\n");
    deskkit(&dir)
        .args(["theme", "--page", "clock"])
        .assert()
        .success()
        .stdout("clock theme: light\n");
}

#[test]
fn test_clock_prints_face() {
    let dir = TempDir::new().unwrap();
    deskkit(&dir)
        .arg("clock")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timezone: UTC"));
}

#[test]
fn test_config_shows_defaults() {
    let dir = TempDir::new().unwrap();
    deskkit(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("history_capacity: 10"))
        .stdout(predicate::str::contains("default_seconds: 300"));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("desk.yaml");
    std::fs::write(&path, "timer:\n  tick_ms: 0\n").unwrap();
    deskkit(&dir)
        .arg("--config")
        .arg(&path)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("tick_ms"));
}

// ============================================================================
// Live commands
// ============================================================================

#[test]
fn test_zero_timer_fails() {
    let dir = TempDir::new().unwrap();
    deskkit(&dir)
        .args(["-q", "timer", "-m", "0", "-s", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("positive"));
}

#[test]
fn test_stopwatch_prints_laps() {
    let dir = TempDir::new().unwrap();
    deskkit(&dir)
        .args(["stopwatch", "--laps", "2", "--every", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lap 2"))
        .stdout(predicate::str::contains("Lap 1"));
}
