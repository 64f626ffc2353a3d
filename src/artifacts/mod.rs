//! Collecting files ROC wrote to the host output directory

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One file from the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub size: u64,
    /// Full text, only when contents were requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactReport {
    pub directory: String,
    pub files: Vec<Artifact>,
}

impl ArtifactReport {
    /// Names joined by newlines, as exposed in step outputs
    pub fn names(&self) -> String {
        self.files
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// List regular files in `dir`, sorted by name. Never fails: an unreadable
/// directory yields an empty report and a warning.
pub fn collect(dir: &Path, include_contents: bool) -> ArtifactReport {
    let mut report = ArtifactReport {
        directory: dir.display().to_string(),
        files: Vec::new(),
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Could not read output directory");
            return report;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        let metadata = match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => continue,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        let content = if include_contents {
            match fs::read(&path) {
                Ok(bytes) => Some(String::from_utf8_lossy(&bytes).to_string()),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable file");
                    continue;
                }
            }
        } else {
            None
        };

        report.files.push(Artifact {
            name: entry.file_name().to_string_lossy().to_string(),
            size: metadata.len(),
            content,
        });
    }

    report.files.sort_by(|a, b| a.name.cmp(&b.name));
    info!(dir = %dir.display(), files = report.files.len(), "Collected output files");
    report
}
