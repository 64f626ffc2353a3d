//! The container runtime boundary
//!
//! Everything this crate does to a container goes through [`ContainerRuntime`],
//! a single "run this subcommand and give me the result" call. The real
//! implementation shells out to the `docker` CLI.

use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RocError};

/// Exit status and captured streams of one runtime invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Human-readable exit status
    pub fn status_text(&self) -> String {
        match self.status {
            Some(code) => format!("status {}", code),
            None => "a signal".to_string(),
        }
    }

    /// Convert a nonzero exit into [`RocError::CommandFailed`]
    pub fn into_result(self, command: &str) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(RocError::CommandFailed {
                command: command.to_string(),
                status: self.status_text(),
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// A container runtime that can execute one subcommand at a time
pub trait ContainerRuntime {
    /// Name of the runtime binary, used in messages
    fn program(&self) -> &str;

    /// Run the runtime with `args` and wait for it to finish
    fn exec(&self, args: &[String]) -> Result<CommandOutput>;

    /// Render a command line for logs and errors
    fn describe(&self, args: &[String]) -> String {
        let mut line = self.program().to_string();
        for arg in redact_args(args) {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}

/// Runtime backed by a Docker-compatible CLI binary
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl DockerCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl ContainerRuntime for DockerCli {
    fn program(&self) -> &str {
        &self.binary
    }

    fn exec(&self, args: &[String]) -> Result<CommandOutput> {
        debug!(command = %self.describe(args), "Invoking container runtime");
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|source| RocError::SpawnError {
                command: self.describe(args),
                source,
            })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Flags whose value must never be printed
const SECRET_FLAGS: &[&str] = &["--api-key"];

/// Copy of `args` with secret flag values masked
pub fn redact_args(args: &[String]) -> Vec<String> {
    let mut redacted = Vec::with_capacity(args.len());
    let mut mask_next = false;
    for arg in args {
        if mask_next {
            redacted.push("***".to_string());
            mask_next = false;
            continue;
        }
        if let Some((flag, _)) = arg.split_once('=') {
            if SECRET_FLAGS.contains(&flag) {
                redacted.push(format!("{}=***", flag));
                continue;
            }
        }
        mask_next = SECRET_FLAGS.contains(&arg.as_str());
        redacted.push(arg.clone());
    }
    redacted
}
