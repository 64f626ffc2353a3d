//! Error types for roc-action

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RocError {
    #[error("Missing required input: {0}")]
    MissingInput(String),

    #[error("Invalid input '{name}': {reason}")]
    InvalidInput { name: String, reason: String },

    #[error("Workspace root is not defined. Set GITHUB_WORKSPACE or pass --workspace")]
    WorkspaceUndefined,

    #[error("Failed to stage {}: {source}", path.display())]
    StagingError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to invoke `{command}`: {source}")]
    SpawnError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RocError>;
