use std::fs;
use std::path::Path;
use std::time::Duration;

use roc_action::cli::RunArgs;
use roc_action::container::testing::{RecordingSleeper, ScriptedRuntime};
use roc_action::container::{CommandOutput, ContainerStatus, PollOutcome};
use roc_action::output::github;
use roc_action::{ActionRunner, RocError};
use tempfile::TempDir;

fn args(workspace: &Path) -> RunArgs {
    RunArgs {
        server_url: Some("https://x".to_string()),
        api_key: Some("k".to_string()),
        patterns: Some("p.yaml".to_string()),
        patterns_content: Some("a: 1".to_string()),
        workspace: Some(workspace.to_path_buf()),
        ..Default::default()
    }
}

#[test]
fn cleanup_runs_exactly_once_whichever_step_fails() {
    let failures = [
        ("run", CommandOutput::failed(125, "launch failed")),
        ("inspect", CommandOutput::failed(1, "inspect failed")),
        ("logs", CommandOutput::failed(1, "logs failed")),
        ("ps", CommandOutput::failed(1, "ps failed")),
    ];

    for (subcommand, output) in failures {
        let workspace = TempDir::new().unwrap();
        let runtime = ScriptedRuntime::new().respond(subcommand, vec![output]);
        let sleeper = RecordingSleeper::new();
        let mut raw = args(workspace.path());
        raw.poll_attempts = Some("2".to_string());

        let _ = ActionRunner::new(&runtime, &sleeper).run(&raw);
        assert_eq!(runtime.count("stop"), 1, "stop count when {} fails", subcommand);
        assert_eq!(runtime.count("rm"), 1, "rm count when {} fails", subcommand);
    }
}

#[test]
fn only_launch_failure_is_fatal() {
    for subcommand in ["ps", "inspect", "logs", "exec"] {
        let workspace = TempDir::new().unwrap();
        let runtime = ScriptedRuntime::new()
            .respond("inspect", vec![CommandOutput::ok("running")])
            .respond(subcommand, vec![CommandOutput::failed(1, "nope")]);
        let sleeper = RecordingSleeper::new();
        let mut raw = args(workspace.path());
        raw.traffic_url = Some("http://localhost".to_string());
        raw.traffic_requests = Some("1".to_string());

        let result = ActionRunner::new(&runtime, &sleeper).run(&raw);
        assert!(result.is_ok(), "{} failure should not abort the run", subcommand);
    }
}

#[test]
fn monitor_terminates_on_first_terminal_status() {
    for terminal_at in 1..=5u32 {
        let workspace = TempDir::new().unwrap();
        let mut statuses = vec![CommandOutput::ok("created"); (terminal_at - 1) as usize];
        statuses.push(CommandOutput::ok("exited"));
        let runtime = ScriptedRuntime::new().respond("inspect", statuses);
        let sleeper = RecordingSleeper::new();
        let mut raw = args(workspace.path());
        raw.poll_attempts = Some("5".to_string());
        raw.poll_interval = Some("10".to_string());

        let report = ActionRunner::new(&runtime, &sleeper).run(&raw).unwrap();
        assert_eq!(
            report.monitor.unwrap().outcome,
            PollOutcome::Reached {
                value: ContainerStatus::Exited,
                attempts: terminal_at
            }
        );
        assert_eq!(runtime.count("inspect"), terminal_at as usize);
        assert_eq!(sleeper.total(), Duration::from_secs(10 * (terminal_at as u64 - 1)));
    }
}

#[test]
fn runtime_unavailable_fails_launch_but_still_cleans_up() {
    let workspace = TempDir::new().unwrap();
    let runtime = ScriptedRuntime::unavailable();
    let sleeper = RecordingSleeper::new();

    let result = ActionRunner::new(&runtime, &sleeper).run(&args(workspace.path()));
    assert!(matches!(result, Err(RocError::SpawnError { .. })));
    assert_eq!(runtime.subcommands(), vec!["ps", "run", "stop", "rm"]);
}

#[test]
fn step_outputs_describe_the_run() {
    let workspace = TempDir::new().unwrap();
    let out = workspace.path().join("roc-output");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("a.json"), "{}").unwrap();
    fs::write(out.join("b.json"), "{}").unwrap();

    let runtime = ScriptedRuntime::new()
        .respond("run", vec![CommandOutput::ok("deadbeef\n")])
        .respond("inspect", vec![CommandOutput::ok("running")])
        .respond("logs", vec![CommandOutput::ok("line 1\nline 2\n")]);
    let sleeper = RecordingSleeper::new();
    let report = ActionRunner::new(&runtime, &sleeper)
        .run(&args(workspace.path()))
        .unwrap();

    let github_output = workspace.path().join("github_output");
    github::write_outputs(&github_output, &github::run_outputs(&report)).unwrap();
    let written = fs::read_to_string(&github_output).unwrap();

    assert!(written.contains("container-id=deadbeef\n"));
    assert!(written.contains("container-name=roc\n"));
    assert!(written.contains("output-files<<"));
    assert!(written.contains("\na.json\nb.json\n"));
    assert!(written.contains("\nline 1\nline 2\n"));
}

#[test]
fn mount_sources_are_workspace_paths_on_the_host() {
    let workspace = TempDir::new().unwrap();
    let runtime = ScriptedRuntime::new().respond("inspect", vec![CommandOutput::ok("running")]);
    let sleeper = RecordingSleeper::new();
    ActionRunner::new(&runtime, &sleeper)
        .run(&args(workspace.path()))
        .unwrap();

    let run = runtime.first("run").unwrap();
    let config = format!("{}:/tmp/roc-config:ro", workspace.path().join("roc-config").display());
    let output = format!("{}:/tmp/roc-output", workspace.path().join("roc-output").display());
    assert!(run.contains(&config), "{:?}", run);
    assert!(run.contains(&output), "{:?}", run);
    assert!(workspace.path().join("roc-config/p.yaml").is_file());
}
