//! Binary-level tests for `oc-install`.
//!
//! None of these reach the database: every case fails (or prints usage)
//! before a connection is attempted.

#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A fresh installation root with the installer settings pointed at it.
fn installer(root: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("oc-install").unwrap();
    cmd.current_dir(root.path())
        .env("OC_INSTALL_ROOT", root.path())
        .env("OC_INSTALL_SKIP_CHECKS", "1")
        .env_remove("OC_INSTALL_SQL")
        .env_remove("RUST_LOG");
    cmd
}

const COMPLETE: &[&str] = &[
    "install",
    "--db_username",
    "root",
    "--db_password",
    "secret",
    "--password",
    "hunter2",
    "--email",
    "admin@example.com",
    "--http_server",
    "http://localhost/shop",
];

#[test]
fn usage_subcommand_prints_usage() {
    let root = TempDir::new().unwrap();
    installer(&root)
        .arg("usage")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Usage:\n======\n\n"))
        .stdout(predicate::str::contains(
            "oc-install install --db_hostname localhost --db_username root",
        ));
}

#[test]
fn no_subcommand_prints_usage() {
    let root = TempDir::new().unwrap();
    installer(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn unknown_subcommand_prints_usage() {
    let root = TempDir::new().unwrap();
    installer(&root)
        .args(["upgrade", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn usage_with_extra_arguments_prints_usage() {
    let root = TempDir::new().unwrap();
    installer(&root)
        .args(["usage", "extra", "--more"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Usage:"));
}

#[test]
fn unknown_flag_prints_usage() {
    let root = TempDir::new().unwrap();
    installer(&root)
        .arg("--bogus")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Usage:"));
}

#[test]
fn unusable_port_is_reported_separately() {
    let root = TempDir::new().unwrap();
    installer(&root)
        .args(COMPLETE)
        .args(["--db_port", "mysql"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "FAILED!: Invalid db_port: mysql is not a port number",
        ))
        .stdout(predicate::str::contains("missing or invalid").not());
}

#[test]
fn missing_fields_are_listed() {
    let root = TempDir::new().unwrap();
    installer(&root)
        .args(["install", "--db_username", "root", "--email", "admin@example.com"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "FAILED! Following inputs were missing or invalid: db_password, password, http_server",
        ));
}

#[test]
fn install_without_options_lists_every_required_field() {
    let root = TempDir::new().unwrap();
    installer(&root)
        .arg("install")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "db_username, db_password, password, email, http_server",
        ));
}

#[test]
fn malformed_argument_fails() {
    let root = TempDir::new().unwrap();
    installer(&root)
        .args(["install", "db_username", "root"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "FAILED!: db_username found in command line args",
        ));
}

#[test]
fn missing_sql_dump_fails_before_connecting() {
    let root = TempDir::new().unwrap();
    installer(&root)
        .args(COMPLETE)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILED!: Could not load sql file:"))
        .stdout(predicate::str::contains("opencart.sql"));
}

#[test]
fn logs_stay_off_stdout() {
    let root = TempDir::new().unwrap();
    installer(&root)
        .env("RUST_LOG", "debug")
        .args(COMPLETE)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Skipping pre-installation checks").not())
        .stderr(predicate::str::contains("Skipping pre-installation checks"));
}
