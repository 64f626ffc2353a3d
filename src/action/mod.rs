//! The end-to-end action run
//!
//! Resolve inputs, stage files, launch, wait, drive traffic, read logs,
//! collect output. Once inputs resolve, cleanup runs exactly once whatever
//! happens in between.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::artifacts::{self, ArtifactReport};
use crate::cli::RunArgs;
use crate::container::{
    build_run_args, cleanup, launch, remove_stale, CleanupReport, ContainerRuntime, LifecycleMonitor,
    MonitorReport, Sleeper,
};
use crate::error::Result;
use crate::inputs::Inputs;
use crate::staging;
use crate::traffic::{self, TrafficSummary};

/// Everything one run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub container_name: String,
    pub container_id: Option<String>,
    pub image: String,
    /// Launch command with secrets redacted
    pub launch_command: String,
    pub dry_run: bool,
    pub monitor: Option<MonitorReport>,
    pub traffic: Option<TrafficSummary>,
    pub logs: Option<String>,
    pub artifacts: ArtifactReport,
    pub cleanup: Option<CleanupReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunReport {
    fn new(inputs: &Inputs) -> Self {
        Self {
            container_name: inputs.container_name.clone(),
            container_id: None,
            image: inputs.image.clone(),
            launch_command: String::new(),
            dry_run: false,
            monitor: None,
            traffic: None,
            logs: None,
            artifacts: ArtifactReport::default(),
            cleanup: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// Drives one action run against a runtime and a sleeper
pub struct ActionRunner<'a, R: ContainerRuntime, S: Sleeper> {
    runtime: &'a R,
    sleeper: &'a S,
    running: Arc<AtomicBool>,
    dry_run: bool,
}

impl<'a, R: ContainerRuntime, S: Sleeper> ActionRunner<'a, R, S> {
    pub fn new(runtime: &'a R, sleeper: &'a S) -> Self {
        Self {
            runtime,
            sleeper,
            running: Arc::new(AtomicBool::new(true)),
            dry_run: false,
        }
    }

    /// Flag cleared by the Ctrl+C handler; polling and traffic stop early when it is
    pub fn with_interrupt(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = running;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Resolve raw arguments and run. Missing inputs fail before any runtime call.
    pub fn run(&self, args: &RunArgs) -> Result<RunReport> {
        let inputs = Inputs::resolve(args)?;
        if self.dry_run {
            return self.plan(&inputs);
        }
        self.run_inputs(&inputs)
    }

    /// Run with already-resolved inputs
    pub fn run_inputs(&self, inputs: &Inputs) -> Result<RunReport> {
        let mut report = RunReport::new(inputs);
        let outcome = self.run_stages(inputs, &mut report);
        if let Err(ref e) = outcome {
            warn!(error = %e, "Run failed, cleaning up");
        }

        report.cleanup = Some(cleanup(self.runtime, &inputs.container_name));
        report.finished_at = Some(Utc::now());
        outcome.map(|()| report)
    }

    /// Stage files and build the launch command without touching the runtime
    pub fn plan(&self, inputs: &Inputs) -> Result<RunReport> {
        let mut report = RunReport::new(inputs);
        let staged = staging::stage(inputs)?;
        let args = build_run_args(inputs, &staged);
        report.launch_command = self.runtime.describe(&args);
        report.dry_run = true;
        report.finished_at = Some(Utc::now());
        info!(command = %report.launch_command, "Dry run, container not launched");
        Ok(report)
    }

    fn run_stages(&self, inputs: &Inputs, report: &mut RunReport) -> Result<()> {
        let staged = staging::stage(inputs)?;

        let args = build_run_args(inputs, &staged);
        report.launch_command = self.runtime.describe(&args);
        remove_stale(self.runtime, &inputs.container_name);
        let handle = launch(self.runtime, &inputs.container_name, &args)?;
        report.container_id = Some(handle.id.clone());

        let monitor = LifecycleMonitor::new(self.runtime, self.sleeper, inputs.poll, self.running.clone());
        let status = monitor.wait(&handle);

        if let Some(plan) = &inputs.traffic {
            if status.is_running() {
                report.traffic = Some(traffic::generate(
                    self.runtime,
                    self.sleeper,
                    &self.running,
                    &handle,
                    plan,
                ));
            } else {
                warn!(
                    container = handle.reference(),
                    status = ?status.last_status,
                    "Container is not running, skipping traffic generation"
                );
            }
        }
        report.monitor = Some(status);

        report.logs = monitor.logs(&handle);
        report.artifacts = artifacts::collect(&staged.output_dir, inputs.print_output);
        Ok(())
    }
}
