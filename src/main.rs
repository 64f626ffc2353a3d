//! roc-action CLI - run ROC in a container and collect its output

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use roc_action::artifacts;
use roc_action::cli::{Args, SubCommand};
use roc_action::container::cleanup;
use roc_action::inputs::{DEFAULT_CONTAINER_NAME, DEFAULT_OUTPUT_DIR};
use roc_action::output::github;
use roc_action::staging::resolve_host_path;
use roc_action::{
    format_output, ActionOutput, ActionRunner, DockerCli, InterruptibleSleeper, OutputFormat, RocError,
};

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Priority: RUST_LOG > --verbose > info
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> roc_action::Result<()> {
    let output_format = if args.json { OutputFormat::Json } else { OutputFormat::Human };
    let runtime = DockerCli::new(args.docker.clone());

    match args.command {
        SubCommand::Run(run_args) => {
            let running = Arc::new(AtomicBool::new(true));
            let r = running.clone();
            // Also fires on SIGTERM (job cancel, `docker stop`), so cleanup still runs
            ctrlc::set_handler(move || {
                r.store(false, Ordering::SeqCst);
            })
            .map_err(|e| RocError::ExecutionError(format!("Failed to set Ctrl+C handler: {}", e)))?;

            let sleeper = InterruptibleSleeper::new(running.clone());
            let report = ActionRunner::new(&runtime, &sleeper)
                .with_interrupt(running)
                .with_dry_run(args.dry_run)
                .run(&run_args)?;

            if !report.dry_run {
                if let Some(ref path) = run_args.github_output.filter(|p| !p.as_os_str().is_empty()) {
                    // Outputs are a convenience; the run itself already succeeded
                    if let Err(e) = github::write_outputs(path, &github::run_outputs(&report)) {
                        warn!(path = %path.display(), error = %e, "Could not write step outputs");
                    }
                }
            }

            println!("{}", format_output(&ActionOutput::Run(Box::new(report)), &output_format));
            Ok(())
        }

        SubCommand::Cleanup { container_name } => {
            let name = container_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONTAINER_NAME.to_string());
            if args.dry_run {
                println!("Would stop and remove container: {}", name);
                return Ok(());
            }
            let report = cleanup(&runtime, &name);
            println!("{}", format_output(&ActionOutput::Cleanup(report), &output_format));
            Ok(())
        }

        SubCommand::Collect { output_dir, workspace, print_output } => {
            let dir = PathBuf::from(
                output_dir
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            );
            let workspace = workspace.filter(|w| !w.as_os_str().is_empty());
            let dir = resolve_host_path(workspace.as_deref(), &dir)?;
            let report = artifacts::collect(&dir, print_output);
            println!("{}", format_output(&ActionOutput::Artifacts(report), &output_format));
            Ok(())
        }
    }
}
