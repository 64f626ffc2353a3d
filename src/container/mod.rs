//! Container lifecycle: launch, monitor, clean up
//!
//! All runtime access goes through the [`ContainerRuntime`] trait so the
//! lifecycle can run against a scripted double in tests.

pub mod cleanup;
mod handle;
pub mod launcher;
pub mod monitor;
mod runtime;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cleanup::{cleanup, CleanupReport};
pub use handle::ContainerHandle;
pub use launcher::{build_run_args, launch, remove_stale, CONTAINER_CONFIG_DIR, CONTAINER_OUTPUT_DIR};
pub use monitor::{
    poll_with_sleep, ContainerStatus, InterruptibleSleeper, LifecycleMonitor, MonitorReport,
    PollOutcome, Sleeper, ThreadSleeper,
};
pub use runtime::{redact_args, CommandOutput, ContainerRuntime, DockerCli};
