//! End-to-end tests for the non-interactive modes (--resolve and
//! --print-state), which write to stdout and exit without a terminal.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn shv() -> Command {
    Command::cargo_bin("shv").unwrap()
}

fn manifest_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"{
            "library": {"id": "lib:org1:demo", "title": "Demo Library"},
            "components": [
                {"id": "lb:org1:demo:html:abc123", "blockType": "html", "displayName": "Introduction"}
            ],
            "collections": [
                {"key": "coll-1", "title": "Starter Collection"}
            ]
        }"#,
    )
    .unwrap();
    file
}

// =============================================================================
// Resolve Mode
// =============================================================================

#[test]
fn resolve_classifies_a_component() {
    shv()
        .args(["--resolve", "lb:org1:demo:html:abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind: Component"))
        .stdout(predicate::str::contains("blockType: html"))
        .stdout(predicate::str::contains("library: lib:org1:demo"));
}

#[test]
fn resolve_classifies_a_container() {
    shv()
        .args(["--resolve", "lct:org1:demo:unit:u1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind: Unit"));
}

#[test]
fn resolve_falls_back_to_collection_key() {
    shv()
        .args(["--resolve", "coll-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind: Collection"));
}

#[test]
fn resolve_rejects_unknown_container_type() {
    shv()
        .args(["--resolve", "lct:org1:demo:chapter:c1"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("error:"));
}

// =============================================================================
// Print-State Mode
// =============================================================================

#[test]
fn print_state_requires_a_link() {
    shv()
        .arg("--print-state")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("requires --link"));
}

#[test]
fn print_state_reports_pending_without_manifest() {
    shv()
        .args([
            "--print-state",
            "--link",
            "/library/lib:org1:demo/item/lb:org1:demo:html:abc123",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("panel: closed"))
        .stdout(predicate::str::contains("pending: component-info"))
        .stdout(predicate::str::contains(
            "pendingTarget: lb:org1:demo:html:abc123",
        ));
}

#[test]
fn print_state_commits_against_a_manifest() {
    let manifest = manifest_file();
    shv()
        .args([
            "--print-state",
            "--link",
            "/library/lib:org1:demo/item/lb:org1:demo:html:abc123?st=manage",
            "--manifest",
        ])
        .arg(manifest.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("panel: component-info"))
        .stdout(predicate::str::contains("target: lb:org1:demo:html:abc123"))
        .stdout(predicate::str::contains("tab: manage"));
}

#[test]
fn print_state_for_bare_library_route() {
    shv()
        .args(["--print-state", "--link", "/library/lib:org1:demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("panel: info"))
        .stdout(predicate::str::contains("tab: (none)"));
}

#[test]
fn print_state_echoes_pending_action() {
    shv()
        .args([
            "--print-state",
            "--link",
            "/library/lib:org1:demo?sa=manage-team",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("action: manage-team"));
}

#[test]
fn print_state_accepts_positional_route() {
    shv()
        .args(["--print-state", "/library/lib:org1:demo/collection/coll-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pending: collection-info"));
}
