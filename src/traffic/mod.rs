//! Synthetic HTTP traffic generated from inside the ROC container
//!
//! Requests go through `exec ... curl` so they originate in the container's
//! (host) network namespace, where ROC is watching.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::container::{ContainerHandle, ContainerRuntime, Sleeper};
use crate::inputs::TrafficPlan;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficSummary {
    pub url: String,
    pub sent: u32,
    pub succeeded: u32,
    pub failed: u32,
    /// HTTP status codes in request order, for requests that completed
    pub status_codes: Vec<String>,
}

/// Arguments for one request
pub fn request_args(handle: &ContainerHandle, url: &str) -> Vec<String> {
    [
        "exec",
        handle.reference(),
        "curl",
        "-s",
        "-o",
        "/dev/null",
        "-w",
        "%{http_code}",
        url,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Issue the planned requests, then wait for ROC to settle.
/// Individual failures are logged and counted, never fatal.
pub fn generate<R: ContainerRuntime, S: Sleeper>(
    runtime: &R,
    sleeper: &S,
    running: &AtomicBool,
    handle: &ContainerHandle,
    plan: &TrafficPlan,
) -> TrafficSummary {
    info!(url = %plan.url, requests = plan.requests, "Generating traffic");
    let mut summary = TrafficSummary {
        url: plan.url.clone(),
        ..Default::default()
    };

    let args = request_args(handle, &plan.url);
    for i in 0..plan.requests {
        if !running.load(Ordering::SeqCst) {
            warn!(sent = summary.sent, "Traffic generation interrupted");
            break;
        }
        if i > 0 {
            sleeper.sleep(plan.interval);
        }

        summary.sent += 1;
        match runtime.exec(&args) {
            Ok(output) if output.success() => {
                let code = output.stdout.trim().to_string();
                debug!(request = i + 1, status = %code, "Request completed");
                summary.succeeded += 1;
                summary.status_codes.push(code);
            }
            Ok(output) => {
                warn!(request = i + 1, stderr = %output.stderr.trim(), "Request failed");
                summary.failed += 1;
            }
            Err(e) => {
                warn!(request = i + 1, error = %e, "Request failed");
                summary.failed += 1;
            }
        }
    }

    if summary.sent > 0 && !plan.settle.is_zero() {
        debug!(secs = plan.settle.as_secs(), "Waiting for ROC to flush output");
        sleeper.sleep(plan.settle);
    }

    info!(
        sent = summary.sent,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Traffic generation finished"
    );
    summary
}
