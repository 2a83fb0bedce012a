//! Basic CLI tests for shv
//!
//! Tests for command-line argument parsing, help output, version display,
//! and error handling for invalid inputs.

use assert_cmd::Command;
use predicates::prelude::*;

fn shv() -> Command {
    Command::cargo_bin("shv").unwrap()
}

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    shv()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE:"))
        .stdout(predicate::str::contains("shv"))
        .stdout(predicate::str::contains("--pick"));
}

#[test]
fn help_short_flag_shows_usage() {
    shv()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE:"));
}

#[test]
fn help_lists_keybindings_and_exit_codes() {
    shv()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("KEYBINDINGS:"))
        .stdout(predicate::str::contains("EXIT CODES:"));
}

#[test]
fn version_flag_shows_version() {
    shv()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_short_flag_shows_version() {
    shv()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// =============================================================================
// Invalid Options (Exit Code 3)
// =============================================================================

#[test]
fn unknown_option_returns_exit_code_3() {
    shv()
        .arg("--unknown-option")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown option"));
}

#[test]
fn invalid_short_option_returns_exit_code_3() {
    shv()
        .arg("-z")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown option"));
}

#[test]
fn bare_word_positional_returns_exit_code_3() {
    // Routes must start with '/'
    shv()
        .arg("library")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown option"));
}

#[test]
fn invalid_link_returns_exit_code_3() {
    shv()
        .args(["--link", "not-a-link"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid link"));
}

#[test]
fn unrecognized_route_returns_exit_code_3() {
    shv()
        .args(["--link", "/course/some:course"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid link"));
}

#[test]
fn link_without_value_returns_exit_code_3() {
    shv()
        .arg("--link")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("requires a route"));
}

#[test]
fn nonexistent_manifest_returns_exit_code_3() {
    shv()
        .args(["--manifest", "/nonexistent/manifest.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn invalid_format_value_returns_exit_code_3() {
    shv()
        .args(["--pick", "--format", "unknown"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn invalid_pick_target_returns_exit_code_3() {
    shv()
        .args(["--pick", "everything"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid pick target"));
}
