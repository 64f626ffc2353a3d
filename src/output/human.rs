//! Human-readable output formatting

use bytesize::ByteSize;

use crate::action::RunReport;
use crate::artifacts::ArtifactReport;
use crate::container::{CleanupReport, PollOutcome};
use crate::output::formatter::ActionOutput;
use crate::output::github::fence_commands;

pub fn format_human(result: &ActionOutput) -> String {
    match result {
        ActionOutput::Run(report) => format_run(report),
        ActionOutput::Cleanup(cleanup) => format_cleanup(cleanup),
        ActionOutput::Artifacts(artifacts) => format_artifacts(artifacts),
    }
}

fn heading(title: &str) -> String {
    format!("{}\n{}\n", title, "-".repeat(title.len()))
}

fn format_run(report: &RunReport) -> String {
    let mut output = heading("ROC Container");
    output.push_str(&format!("Name:    {}\n", report.container_name));
    if let Some(ref id) = report.container_id {
        output.push_str(&format!("Id:      {}\n", truncate(id, 12)));
    }
    output.push_str(&format!("Image:   {}\n", report.image));
    output.push_str(&format!("Command: {}\n", report.launch_command));

    if report.dry_run {
        output.push_str("\n[DRY RUN] Container was not launched\n");
        return output;
    }

    if let Some(ref monitor) = report.monitor {
        output.push('\n');
        output.push_str(&heading("Status"));
        let line = match &monitor.outcome {
            PollOutcome::Reached { value, attempts } => {
                format!("{} after {} poll(s)", value, attempts)
            }
            PollOutcome::Exhausted { attempts } => match monitor.last_status {
                Some(ref status) => format!("still {} after {} poll(s)", status, attempts),
                None => format!("unknown after {} poll(s)", attempts),
            },
            PollOutcome::Interrupted { attempts } => {
                format!("interrupted after {} poll(s)", attempts)
            }
        };
        output.push_str(&format!("{}\n", line));
    }

    if let Some(ref traffic) = report.traffic {
        output.push('\n');
        output.push_str(&heading("Traffic"));
        output.push_str(&format!("URL:       {}\n", traffic.url));
        output.push_str(&format!(
            "Requests:  {} sent, {} succeeded, {} failed\n",
            traffic.sent, traffic.succeeded, traffic.failed
        ));
    }

    output.push('\n');
    output.push_str(&format_artifacts(&report.artifacts));

    if let Some(ref cleanup) = report.cleanup {
        output.push('\n');
        output.push_str(&format_cleanup(cleanup));
    }

    if let Some(ref logs) = report.logs {
        output.push_str("\n::group::ROC logs\n");
        output.push_str(&fence_commands(logs));
        output.push_str("::endgroup::\n");
    }

    output
}

fn format_artifacts(artifacts: &ArtifactReport) -> String {
    let mut output = heading("Output Files");
    if artifacts.is_empty() {
        output.push_str(&format!("No files found in {}\n", artifacts.directory));
        return output;
    }

    output.push_str(&format!("{:<40} {:>12}\n", "NAME", "SIZE"));
    output.push_str(&"-".repeat(53));
    output.push('\n');
    for file in &artifacts.files {
        output.push_str(&format!(
            "{:<40} {:>12}\n",
            truncate(&file.name, 40),
            ByteSize(file.size).to_string()
        ));
    }

    for file in artifacts.files.iter().filter(|f| f.content.is_some()) {
        output.push_str(&format!("\n==> {} <==\n", file.name));
        if let Some(ref content) = file.content {
            output.push_str(&fence_commands(content));
        }
    }
    output
}

fn format_cleanup(cleanup: &CleanupReport) -> String {
    let mut output = heading("Cleanup");
    output.push_str(&format!(
        "{}: stopped: {}, removed: {}\n",
        cleanup.container,
        if cleanup.stopped { "yes" } else { "no" },
        if cleanup.removed { "yes" } else { "no" }
    ));
    output
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
