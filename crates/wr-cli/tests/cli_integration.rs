//! CLI integration tests
//!
//! Tests the warren CLI surface using assert_cmd. Invalid flag
//! combinations must be rejected before either role starts.

use std::net::TcpListener;

use assert_cmd::Command;
use predicates::prelude::*;

fn warren() -> Command {
    Command::cargo_bin("warren")
        .expect("Failed to locate warren binary - ensure it's built before running tests")
}

/// A loopback port with nothing listening behind it
fn dead_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe socket");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[test]
fn test_cli_help() {
    warren()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("warren"))
        .stdout(predicate::str::contains(
            "Minimal command-and-control channel",
        ));
}

#[test]
fn test_cli_version() {
    warren()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("warren"));
}

#[test]
fn test_cli_serve_help() {
    warren()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--execute"))
        .stdout(predicate::str::contains("--shell"));
}

#[test]
fn test_cli_connect_help() {
    warren()
        .args(["connect", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--target"));
}

#[test]
fn test_cli_unknown_command() {
    warren()
        .arg("nonexistent-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_cli_serve_requires_a_profile() {
    warren().args(["serve", "--port", "9000"]).assert().failure();
}

#[test]
fn test_cli_serve_rejects_both_profiles() {
    warren()
        .args(["serve", "--port", "9000", "--shell", "--execute", "ls"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_cli_serve_rejects_blank_execute_command() {
    warren()
        .args(["serve", "--port", "9000", "--execute", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("command must not be empty"));
}

#[test]
fn test_cli_serve_requires_port() {
    warren().args(["serve", "--shell"]).assert().failure();
}

#[test]
fn test_cli_serve_rejects_target_flag() {
    // Target is a client-mode flag
    warren()
        .args(["serve", "--port", "9000", "--shell", "--target", "127.0.0.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}

#[test]
fn test_cli_connect_requires_target() {
    warren().args(["connect", "--port", "9000"]).assert().failure();
}

#[test]
fn test_cli_connect_rejects_profile_flags() {
    warren()
        .args(["connect", "--target", "127.0.0.1", "--port", "9000", "--shell"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}

#[test]
fn test_cli_rejects_out_of_range_port() {
    warren()
        .args(["serve", "--port", "70000", "--shell"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_cli_connect_rejects_malformed_address() {
    warren()
        .args(["connect", "--target", "999.1.1.1", "--port", "9000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_cli_connect_rejects_hostname_target() {
    // Only dotted-quad IPv4 targets are accepted
    warren()
        .args(["connect", "--target", "localhost", "--port", "9000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_cli_connect_reports_refused_connection() {
    let port = dead_port();

    warren()
        .args(["connect", "--target", "127.0.0.1", "--port", &port.to_string()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Couldn't connect to"));
}
