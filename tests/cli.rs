use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const MISSING_DOCKER: &str = "roc-action-test-no-such-docker";

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("roc-action").unwrap();
    cmd.env_clear();
    cmd
}

#[test]
fn run_without_inputs_fails_fast() {
    cmd()
        .args(["--docker", MISSING_DOCKER, "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required input: server-url"))
        .stderr(predicate::str::contains("Failed to invoke").not());
}

#[test]
fn dry_run_prints_launch_command() {
    let workspace = TempDir::new().unwrap();
    cmd()
        .args([
            "--dry-run",
            "run",
            "--server-url",
            "https://x",
            "--api-key",
            "k",
            "--patterns",
            "p.yaml",
            "--patterns-content",
            "a: 1",
        ])
        .arg("--workspace")
        .arg(workspace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "--patterns /tmp/roc-config/p.yaml --watch /tmp/roc-output",
        ))
        .stdout(predicate::str::contains("--api-key ***"))
        .stdout(predicate::str::contains("[DRY RUN]"));

    let staged = workspace.path().join("roc-config").join("p.yaml");
    assert_eq!(fs::read_to_string(staged).unwrap(), "a: 1");
}

#[test]
fn inputs_are_read_from_runner_environment() {
    let workspace = TempDir::new().unwrap();
    cmd()
        .env("INPUT_SERVER-URL", "https://x")
        .env("INPUT_API-KEY", "k")
        .env("INPUT_PATTERNS", "p.yaml")
        .env("INPUT_PATTERNS-CONTENT", "a: 1")
        .env("INPUT_IMAGE", "")
        .env("INPUT_CONTAINER-NAME", "roc-ci")
        .env("GITHUB_WORKSPACE", workspace.path())
        .args(["--dry-run", "--json", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"container_name\": \"roc-ci\""))
        .stdout(predicate::str::contains("ghcr.io/roc-sh/roc:latest"));
}

#[test]
fn run_with_missing_runtime_reports_launch_failure() {
    let workspace = TempDir::new().unwrap();
    cmd()
        .args([
            "--docker",
            MISSING_DOCKER,
            "run",
            "--server-url",
            "https://x",
            "--api-key",
            "k",
            "--patterns",
            "p.yaml",
            "--patterns-content",
            "a: 1",
        ])
        .arg("--workspace")
        .arg(workspace.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to invoke"));
}

#[test]
fn cleanup_never_fails() {
    cmd()
        .args(["--docker", MISSING_DOCKER, "cleanup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("roc: stopped: no, removed: no"));
}

#[test]
fn collect_empty_output_directory() {
    let workspace = TempDir::new().unwrap();
    fs::create_dir(workspace.path().join("roc-output")).unwrap();
    cmd()
        .args(["--json", "collect"])
        .arg("--workspace")
        .arg(workspace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"files\": []"));
}

#[test]
fn collect_prints_file_contents() {
    let workspace = TempDir::new().unwrap();
    let out = workspace.path().join("custom-out");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("report.txt"), "3 flows observed\n").unwrap();

    cmd()
        .args(["collect", "--output-dir"])
        .arg(&out)
        .arg("--print-output")
        .assert()
        .success()
        .stdout(predicate::str::contains("report.txt"))
        .stdout(predicate::str::contains("3 flows observed"));
}
