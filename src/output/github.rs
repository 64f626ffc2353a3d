//! Step outputs for the GitHub Actions runner
//!
//! Outputs are appended to the file named by `GITHUB_OUTPUT`. Multiline values
//! use the `name<<DELIMITER` form.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::action::RunReport;
use crate::error::Result;

/// Step outputs derived from a run
pub fn run_outputs(report: &RunReport) -> Vec<(&'static str, String)> {
    vec![
        (
            "container-id",
            report
                .container_id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| report.container_name.clone()),
        ),
        ("container-name", report.container_name.clone()),
        ("output-files", report.artifacts.names()),
        ("logs", report.logs.clone().unwrap_or_default()),
    ]
}

/// Render one output entry
pub fn encode_output(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{}={}\n", name, value);
    }

    let delimiter = unique_token("ROC_EOF_", value);
    let mut entry = format!("{}<<{}\n{}", name, delimiter, value);
    if !value.ends_with('\n') {
        entry.push('\n');
    }
    entry.push_str(&delimiter);
    entry.push('\n');
    entry
}

/// A token that does not occur anywhere in `text`
pub fn unique_token(prefix: &str, text: &str) -> String {
    let mut token = format!("{}{}", prefix, chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default());
    while text.contains(&token) {
        token.push('_');
    }
    token
}

/// Wrap text the runner must not interpret as workflow commands.
/// Command processing is suspended until the matching resume token.
pub fn fence_commands(text: &str) -> String {
    let token = unique_token("roc-", text);
    let mut fenced = format!("::stop-commands::{}\n{}", token, text);
    if !text.ends_with('\n') {
        fenced.push('\n');
    }
    fenced.push_str(&format!("::{}::\n", token));
    fenced
}

/// Append outputs to `path`
pub fn write_outputs(path: &Path, outputs: &[(&str, String)]) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (name, value) in outputs {
        file.write_all(encode_output(name, value).as_bytes())?;
    }
    debug!(path = %path.display(), count = outputs.len(), "Wrote step outputs");
    Ok(())
}
