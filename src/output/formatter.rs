//! Output formatting

use serde::Serialize;

use crate::action::RunReport;
use crate::artifacts::ArtifactReport;
use crate::container::CleanupReport;
use crate::output::human::format_human;
use crate::output::json::format_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Result of any subcommand
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ActionOutput {
    Run(Box<RunReport>),
    Cleanup(CleanupReport),
    Artifacts(ArtifactReport),
}

pub fn format_output(result: &ActionOutput, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(result),
        OutputFormat::Json => format_json(result),
    }
}
