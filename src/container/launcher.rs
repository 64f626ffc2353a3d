//! Building and executing the container launch

use tracing::{info, warn};

use super::handle::ContainerHandle;
use super::runtime::ContainerRuntime;
use crate::error::Result;
use crate::inputs::Inputs;
use crate::staging::StagedPaths;

/// Config directory as seen from inside the container
pub const CONTAINER_CONFIG_DIR: &str = "/tmp/roc-config";
/// Directory ROC writes output into, inside the container
pub const CONTAINER_OUTPUT_DIR: &str = "/tmp/roc-output";
pub const CONTAINER_LIBSSL_PATH: &str = "/usr/lib/roc/libssl.so";
pub const CONTAINER_LIBCRYPTO_PATH: &str = "/usr/lib/roc/libcrypto.so";

/// Pattern file path inside the container
pub fn container_pattern_path(file_name: &str) -> String {
    format!("{}/{}", CONTAINER_CONFIG_DIR, file_name)
}

/// Arguments for the `run` invocation, in order
pub fn build_run_args(inputs: &Inputs, staged: &StagedPaths) -> Vec<String> {
    let mounts = [
        ("/proc".to_string(), "/host/proc", Some("ro")),
        ("/sys".to_string(), "/sys", Some("ro")),
        (
            inputs.libraries.libssl.display().to_string(),
            CONTAINER_LIBSSL_PATH,
            Some("ro"),
        ),
        (
            inputs.libraries.libcrypto.display().to_string(),
            CONTAINER_LIBCRYPTO_PATH,
            Some("ro"),
        ),
        (
            staged.config_dir.display().to_string(),
            CONTAINER_CONFIG_DIR,
            Some("ro"),
        ),
        (
            staged.output_dir.display().to_string(),
            CONTAINER_OUTPUT_DIR,
            None,
        ),
    ];

    let mut args: Vec<String> = [
        "run",
        "-d",
        "--name",
        inputs.container_name.as_str(),
        "--privileged",
        "--network",
        "host",
        "--pid",
        "host",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for (host, target, mode) in mounts {
        args.push("-v".to_string());
        args.push(match mode {
            Some(mode) => format!("{}:{}:{}", host, target, mode),
            None => format!("{}:{}", host, target),
        });
    }

    args.push(inputs.image.clone());
    args.extend([
        "--server-url".to_string(),
        inputs.server_url.clone(),
        "--api-key".to_string(),
        inputs.api_key.clone(),
        "--patterns".to_string(),
        container_pattern_path(&staged.pattern_file),
        "--watch".to_string(),
        CONTAINER_OUTPUT_DIR.to_string(),
    ]);
    args.extend(inputs.extra_args.iter().cloned());
    args
}

/// Remove a leftover container with the same name from an earlier run.
/// Failures are logged; the launch itself reports anything that still conflicts.
pub fn remove_stale<R: ContainerRuntime>(runtime: &R, name: &str) {
    let args = vec![
        "ps".to_string(),
        "-a".to_string(),
        "-q".to_string(),
        "--filter".to_string(),
        format!("name=^{}$", name),
    ];
    let existing = match runtime.exec(&args) {
        Ok(output) if output.success() => output.stdout.trim().to_string(),
        Ok(output) => {
            warn!(container = name, stderr = %output.stderr.trim(), "Could not list containers");
            return;
        }
        Err(e) => {
            warn!(container = name, error = %e, "Could not list containers");
            return;
        }
    };

    if existing.is_empty() {
        return;
    }

    warn!(container = name, id = %existing, "Removing stale container from a previous run");
    let rm = vec!["rm".to_string(), "-f".to_string(), name.to_string()];
    match runtime.exec(&rm) {
        Ok(output) if output.success() => {}
        Ok(output) => warn!(container = name, stderr = %output.stderr.trim(), "Stale container removal failed"),
        Err(e) => warn!(container = name, error = %e, "Stale container removal failed"),
    }
}

/// Execute the launch. A nonzero exit aborts the run; there is no retry.
pub fn launch<R: ContainerRuntime>(runtime: &R, name: &str, args: &[String]) -> Result<ContainerHandle> {
    let command = runtime.describe(args);
    info!(%command, "Launching ROC container");

    let output = runtime.exec(args)?.into_result(&command)?;
    let id = output.stdout.trim().to_string();
    let handle = ContainerHandle::new(name, id);
    info!(container = name, id = handle.display_id(), "Container started");
    Ok(handle)
}
