//! Host-side staging of the config and output directories

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, RocError};
use crate::inputs::{Inputs, PatternSource};

/// Host paths prepared for the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPaths {
    pub config_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Host location of the staged pattern file
    pub pattern_path: PathBuf,
    /// Name of the pattern file inside the config directory
    pub pattern_file: String,
}

/// Resolve a host path against the workspace root
pub fn resolve_host_path(workspace: Option<&Path>, path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    match workspace {
        Some(root) => Ok(root.join(path)),
        None => Err(RocError::WorkspaceUndefined),
    }
}

/// Create the host directories and write the pattern file
pub fn stage(inputs: &Inputs) -> Result<StagedPaths> {
    let workspace = inputs.workspace.as_deref();
    let config_dir = resolve_host_path(workspace, &inputs.config_dir)?;
    let output_dir = resolve_host_path(workspace, &inputs.output_dir)?;

    for dir in [&config_dir, &output_dir] {
        fs::create_dir_all(dir).map_err(|source| RocError::StagingError {
            path: dir.clone(),
            source,
        })?;
    }

    let content = match &inputs.pattern {
        PatternSource::Inline { content, .. } => content.clone().into_bytes(),
        PatternSource::File(path) => {
            let source_path = resolve_host_path(workspace, path)?;
            debug!(path = %source_path.display(), "Reading pattern file");
            fs::read(&source_path).map_err(|source| RocError::StagingError {
                path: source_path.clone(),
                source,
            })?
        }
    };

    let pattern_file = inputs.pattern.file_name();
    let pattern_path = config_dir.join(&pattern_file);
    fs::write(&pattern_path, &content).map_err(|source| RocError::StagingError {
        path: pattern_path.clone(),
        source,
    })?;

    info!(
        pattern = %pattern_path.display(),
        bytes = content.len(),
        output = %output_dir.display(),
        "Staged ROC configuration"
    );

    Ok(StagedPaths {
        config_dir,
        output_dir,
        pattern_path,
        pattern_file,
    })
}
