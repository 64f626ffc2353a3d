//! Test doubles for the runtime and clock boundaries
//!
//! [`ScriptedRuntime`] records every invocation and answers from
//! per-subcommand response queues. [`RecordingSleeper`] records requested
//! sleeps without blocking.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use super::monitor::Sleeper;
use super::runtime::{CommandOutput, ContainerRuntime};
use crate::error::{Result, RocError};

/// Runtime double driven by canned responses
#[derive(Debug, Default)]
pub struct ScriptedRuntime {
    calls: RefCell<Vec<Vec<String>>>,
    responses: RefCell<HashMap<String, VecDeque<CommandOutput>>>,
    unavailable: bool,
}

impl ScriptedRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runtime whose binary cannot be spawned at all
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Queue responses for a subcommand. The last one repeats once the queue drains;
    /// subcommands without responses succeed with empty output.
    pub fn respond(self, subcommand: &str, outputs: Vec<CommandOutput>) -> Self {
        self.responses
            .borrow_mut()
            .insert(subcommand.to_string(), outputs.into());
        self
    }

    /// Every invocation, in order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Number of invocations of `subcommand`
    pub fn count(&self, subcommand: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|args| args.first().map(String::as_str) == Some(subcommand))
            .count()
    }

    /// Arguments of the first invocation of `subcommand`
    pub fn first(&self, subcommand: &str) -> Option<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .find(|args| args.first().map(String::as_str) == Some(subcommand))
            .cloned()
    }

    /// Subcommands in invocation order
    pub fn subcommands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|args| args.first().cloned())
            .collect()
    }
}

impl ContainerRuntime for ScriptedRuntime {
    fn program(&self) -> &str {
        "docker"
    }

    fn exec(&self, args: &[String]) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(args.to_vec());
        if self.unavailable {
            return Err(RocError::SpawnError {
                command: self.describe(args),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "docker not found"),
            });
        }

        let subcommand = args.first().cloned().unwrap_or_default();
        let mut responses = self.responses.borrow_mut();
        let output = match responses.get_mut(&subcommand) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => CommandOutput::ok(""),
        };
        Ok(output)
    }
}

/// Sleeper that only records the durations it was asked to wait
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    pub fn total(&self) -> Duration {
        self.sleeps.borrow().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}
