//! Stopping and removing the container

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::runtime::ContainerRuntime;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub container: String,
    pub stopped: bool,
    pub removed: bool,
}

/// Stop and remove `name`. Never fails: the container may already be gone,
/// and a cleanup problem must not mask the error that ended the run.
pub fn cleanup<R: ContainerRuntime>(runtime: &R, name: &str) -> CleanupReport {
    let stopped = attempt(runtime, &["stop", name]);
    let removed = attempt(runtime, &["rm", name]);
    info!(container = name, stopped, removed, "Cleanup finished");
    CleanupReport {
        container: name.to_string(),
        stopped,
        removed,
    }
}

fn attempt<R: ContainerRuntime>(runtime: &R, args: &[&str]) -> bool {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    match runtime.exec(&args) {
        Ok(output) if output.success() => true,
        Ok(output) => {
            debug!(command = %runtime.describe(&args), stderr = %output.stderr.trim(), "Ignoring cleanup failure");
            false
        }
        Err(e) => {
            debug!(error = %e, "Ignoring cleanup failure");
            false
        }
    }
}
