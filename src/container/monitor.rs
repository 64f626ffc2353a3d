//! Lifecycle monitoring for the launched container
//!
//! Status is polled through `inspect` on a fixed interval up to a fixed bound.
//! The loop itself is [`poll_with_sleep`], a bounded retry-with-sleep routine
//! parameterized by a [`Sleeper`] so tests never wait on a real timer.

use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::handle::ContainerHandle;
use super::runtime::ContainerRuntime;
use crate::inputs::PollSettings;

/// Something that can block the current thread for a while
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Sleeps in short slices and returns early once `running` is cleared
#[derive(Debug, Clone)]
pub struct InterruptibleSleeper {
    running: Arc<AtomicBool>,
    slice: Duration,
}

impl InterruptibleSleeper {
    pub fn new(running: Arc<AtomicBool>) -> Self {
        Self {
            running,
            slice: Duration::from_millis(200),
        }
    }

    pub fn with_slice(mut self, slice: Duration) -> Self {
        self.slice = slice;
        self
    }
}

impl Sleeper for InterruptibleSleeper {
    fn sleep(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        while self.running.load(Ordering::SeqCst) {
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            std::thread::sleep(self.slice.min(deadline - now));
        }
    }
}

/// Container state as reported by `inspect`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    Unknown(String),
}

impl ContainerStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "created" => ContainerStatus::Created,
            "running" => ContainerStatus::Running,
            "paused" => ContainerStatus::Paused,
            "restarting" => ContainerStatus::Restarting,
            "removing" => ContainerStatus::Removing,
            "exited" => ContainerStatus::Exited,
            "dead" => ContainerStatus::Dead,
            other => ContainerStatus::Unknown(other.to_string()),
        }
    }

    /// States that end polling
    pub fn is_terminal(&self) -> bool {
        matches!(self, ContainerStatus::Running | ContainerStatus::Exited)
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerStatus::Created => write!(f, "created"),
            ContainerStatus::Running => write!(f, "running"),
            ContainerStatus::Paused => write!(f, "paused"),
            ContainerStatus::Restarting => write!(f, "restarting"),
            ContainerStatus::Removing => write!(f, "removing"),
            ContainerStatus::Exited => write!(f, "exited"),
            ContainerStatus::Dead => write!(f, "dead"),
            ContainerStatus::Unknown(s) => write!(f, "unknown ({})", s),
        }
    }
}

/// How a bounded poll ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PollOutcome<T> {
    /// The probe produced a value on attempt `attempts`
    Reached { value: T, attempts: u32 },
    /// Every attempt was used without a result
    Exhausted { attempts: u32 },
    /// The stop flag was cleared before the bound was reached
    Interrupted { attempts: u32 },
}

impl<T> PollOutcome<T> {
    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Reached { attempts, .. }
            | PollOutcome::Exhausted { attempts }
            | PollOutcome::Interrupted { attempts } => *attempts,
        }
    }
}

/// Call `probe` up to `settings.max_attempts` times, sleeping `settings.interval`
/// between attempts. Stops as soon as the probe breaks or `running` is cleared.
pub fn poll_with_sleep<T, S, F>(
    settings: PollSettings,
    sleeper: &S,
    running: &AtomicBool,
    mut probe: F,
) -> PollOutcome<T>
where
    S: Sleeper + ?Sized,
    F: FnMut(u32) -> ControlFlow<T>,
{
    let mut attempts = 0;
    while attempts < settings.max_attempts {
        if !running.load(Ordering::SeqCst) {
            return PollOutcome::Interrupted { attempts };
        }
        attempts += 1;
        if let ControlFlow::Break(value) = probe(attempts) {
            return PollOutcome::Reached { value, attempts };
        }
        if attempts < settings.max_attempts {
            sleeper.sleep(settings.interval);
        }
    }
    PollOutcome::Exhausted { attempts }
}

/// Result of waiting on the container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorReport {
    pub outcome: PollOutcome<ContainerStatus>,
    /// Last status seen, terminal or not
    pub last_status: Option<ContainerStatus>,
}

impl MonitorReport {
    pub fn is_running(&self) -> bool {
        self.last_status == Some(ContainerStatus::Running)
    }
}

/// Watches one container through the runtime
pub struct LifecycleMonitor<'a, R: ContainerRuntime, S: Sleeper> {
    runtime: &'a R,
    sleeper: &'a S,
    settings: PollSettings,
    running: Arc<AtomicBool>,
}

impl<'a, R: ContainerRuntime, S: Sleeper> LifecycleMonitor<'a, R, S> {
    pub fn new(runtime: &'a R, sleeper: &'a S, settings: PollSettings, running: Arc<AtomicBool>) -> Self {
        Self {
            runtime,
            sleeper,
            settings,
            running,
        }
    }

    /// Current status, or `None` when `inspect` fails
    pub fn status(&self, handle: &ContainerHandle) -> Option<ContainerStatus> {
        let args = vec![
            "inspect".to_string(),
            "-f".to_string(),
            "{{.State.Status}}".to_string(),
            handle.reference().to_string(),
        ];
        match self.runtime.exec(&args) {
            Ok(output) if output.success() => Some(ContainerStatus::parse(&output.stdout)),
            Ok(output) => {
                warn!(container = handle.reference(), stderr = %output.stderr.trim(), "inspect failed");
                None
            }
            Err(e) => {
                warn!(container = handle.reference(), error = %e, "inspect failed");
                None
            }
        }
    }

    /// Poll until the container is running or exited, or the bound is used up
    pub fn wait(&self, handle: &ContainerHandle) -> MonitorReport {
        info!(
            container = handle.reference(),
            attempts = self.settings.max_attempts,
            interval_secs = self.settings.interval.as_secs(),
            "Waiting for container"
        );

        let mut last_status = None;
        let outcome = poll_with_sleep(self.settings, self.sleeper, &self.running, |attempt| {
            let status = self.status(handle);
            debug!(attempt, status = ?status, "Polled container status");
            last_status = status.clone();
            match status {
                Some(status) if status.is_terminal() => ControlFlow::Break(status),
                _ => ControlFlow::Continue(()),
            }
        });

        match &outcome {
            PollOutcome::Reached { value, attempts } => {
                info!(container = handle.reference(), status = %value, attempts, "Container reached terminal state")
            }
            PollOutcome::Exhausted { attempts } => {
                warn!(container = handle.reference(), attempts, "Container did not start within the poll bound")
            }
            PollOutcome::Interrupted { attempts } => {
                warn!(container = handle.reference(), attempts, "Polling interrupted")
            }
        }

        MonitorReport { outcome, last_status }
    }

    /// Retrieve the container logs once. Stdout and stderr are combined.
    pub fn logs(&self, handle: &ContainerHandle) -> Option<String> {
        let args = vec!["logs".to_string(), handle.reference().to_string()];
        match self.runtime.exec(&args) {
            Ok(output) if output.success() => {
                let mut logs = output.stdout;
                if !output.stderr.is_empty() {
                    if !logs.is_empty() && !logs.ends_with('\n') {
                        logs.push('\n');
                    }
                    logs.push_str(&output.stderr);
                }
                debug!(container = handle.reference(), bytes = logs.len(), "Retrieved logs");
                Some(logs)
            }
            Ok(output) => {
                warn!(container = handle.reference(), stderr = %output.stderr.trim(), "Could not retrieve logs");
                None
            }
            Err(e) => {
                warn!(container = handle.reference(), error = %e, "Could not retrieve logs");
                None
            }
        }
    }
}
