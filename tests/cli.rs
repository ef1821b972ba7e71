//
//  bitbucket-ops
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

/// A `bbops` command isolated from the user's config, environment and network.
fn bbops(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bbops").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env_remove("BBOPS_WORKSPACE")
        .env_remove("BBOPS_USERNAME")
        .env_remove("BBOPS_SECRET")
        .env_remove("BBOPS_DEBUG")
        .env("BBOPS_BASE_URL", "http://127.0.0.1:9/2.0");
    cmd
}

fn records_file(home: &TempDir, records: &Value) -> std::path::PathBuf {
    let path = home.path().join("records.json");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{}", records).unwrap();
    path
}

#[test]
fn test_help_lists_operations() {
    let home = TempDir::new().unwrap();
    bbops(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("commit-files"))
        .stdout(predicate::str::contains("search-prs"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn test_operations_catalogue() {
    let home = TempDir::new().unwrap();
    let output = bbops(&home)
        .args(["operations", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let catalogue: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(catalogue.len(), 8);
    assert_eq!(catalogue[0]["operation"], "commit_files");
}

#[test]
fn test_missing_credentials_exit_code() {
    let home = TempDir::new().unwrap();
    bbops(&home)
        .args(["get-pr", "--repo", "app", "7"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("No workspace configured"));
}

#[test]
fn test_invalid_parameter_fails_before_network() {
    let home = TempDir::new().unwrap();
    bbops(&home)
        .env("BBOPS_SECRET", "s3cret")
        .args(["-w", "acme", "-u", "jdoe", "get-pr", "--repo", "app", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pull_request_id"));
}

#[test]
fn test_dry_run_prints_requests() {
    let home = TempDir::new().unwrap();
    let output = bbops(&home)
        .args([
            "--json", "-w", "acme", "create-pr", "-r", "app", "-s", "feat/x", "-d", "main", "-t",
            "Add X", "--dry-run",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let requests: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["method"], "POST");
    assert_eq!(
        requests[0]["url"],
        "http://127.0.0.1:9/2.0/repositories/acme/app/pullrequests"
    );
    assert_eq!(requests[0]["body"]["source"]["branch"]["name"], "feat/x");
    assert_eq!(requests[0]["body"]["close_source_branch"], false);
}

#[test]
fn test_batch_continue_on_fail() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let first = server
        .mock("GET", "/2.0/repositories/acme/app/pullrequests/1")
        .match_header("authorization", "Basic amRvZTpzM2NyZXQ=")
        .with_status(200)
        .with_body(r#"{"id": 1, "title": "First", "state": "OPEN"}"#)
        .create();
    let second = server
        .mock("GET", "/2.0/repositories/acme/app/pullrequests/2")
        .with_status(404)
        .with_body(r#"{"type": "error", "error": {"message": "Pull request not found"}}"#)
        .create();
    let third = server
        .mock("GET", "/2.0/repositories/acme/app/src/main/README.md")
        .with_status(200)
        .with_body("hello")
        .create();

    let path = records_file(
        &home,
        &json!([
            {"operation": "getPR", "repository": "app", "pullRequestId": 1},
            {"operation": "get_pull_request", "repository": "app", "pull_request_id": 2},
            {"operation": "getFileContent", "repository": "app", "branch": "main", "filePath": "README.md"}
        ]),
    );

    let output = bbops(&home)
        .env("BBOPS_BASE_URL", format!("{}/2.0", server.url()))
        .env("BBOPS_SECRET", "s3cret")
        .args(["--json", "-w", "acme", "-u", "jdoe", "run", "--continue-on-fail"])
        .arg(&path)
        .output()
        .unwrap();

    first.assert();
    second.assert();
    third.assert();
    assert_eq!(output.status.code(), Some(16));

    let results: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        results,
        json!([
            {"id": 1, "title": "First", "state": "OPEN"},
            {"error": "Pull request not found"},
            {"content": "hello", "path": "README.md", "branch": "main"}
        ])
    );
}

#[test]
fn test_batch_aborts_on_first_failure() {
    let home = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let _failing = server
        .mock("POST", "/2.0/repositories/acme/app/pullrequests/5/comments")
        .with_status(403)
        .with_body(r#"{"type": "error", "error": {"message": "Forbidden"}}"#)
        .create();
    let never = server
        .mock("GET", "/2.0/repositories/acme/app/pullrequests/5")
        .expect(0)
        .create();

    let path = records_file(
        &home,
        &json!([
            {"operation": "addPRComment", "repository": "app", "pullRequestId": 5, "comment": "hi"},
            {"operation": "getPR", "repository": "app", "pullRequestId": 5}
        ]),
    );

    bbops(&home)
        .env("BBOPS_BASE_URL", format!("{}/2.0", server.url()))
        .env("BBOPS_SECRET", "s3cret")
        .args(["-w", "acme", "-u", "jdoe", "run"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("record 0 (add_comment) failed: Forbidden"));

    never.assert();
}

#[test]
fn test_config_set_and_get() {
    let home = TempDir::new().unwrap();
    bbops(&home)
        .args(["config", "set", "credentials.workspace", "acme"])
        .assert()
        .success();
    bbops(&home)
        .args(["config", "get", "credentials.workspace"])
        .assert()
        .success()
        .stdout("acme\n");
    bbops(&home)
        .args(["config", "set", "api.timeout_secs", "never"])
        .assert()
        .failure();
}
