//! Input resolution
//!
//! Turns the raw `run` arguments into a fully-defaulted [`Inputs`] value.
//! Required values are checked here, before anything touches the runtime.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::RunArgs;
use crate::error::{Result, RocError};

pub const DEFAULT_IMAGE: &str = "ghcr.io/roc-sh/roc:latest";
pub const DEFAULT_CONTAINER_NAME: &str = "roc";
pub const DEFAULT_CONFIG_DIR: &str = "roc-config";
pub const DEFAULT_OUTPUT_DIR: &str = "roc-output";
pub const DEFAULT_PATTERN_FILE: &str = "patterns.yaml";
pub const DEFAULT_SSL_VERSION: &str = "3";
pub const DEFAULT_LIB_DIR: &str = "/usr/lib/x86_64-linux-gnu";

pub const DEFAULT_POLL_ATTEMPTS: u32 = 30;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_TRAFFIC_REQUESTS: u32 = 10;
pub const DEFAULT_TRAFFIC_INTERVAL_SECS: u64 = 1;
pub const DEFAULT_SETTLE_SECS: u64 = 5;

/// Where the pattern content comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSource {
    /// Content supplied directly; staged under `file_name`
    Inline { file_name: String, content: String },
    /// Content read from a host file; staged under the same file name
    File(PathBuf),
}

impl PatternSource {
    /// File name the pattern is staged under
    pub fn file_name(&self) -> String {
        match self {
            PatternSource::Inline { file_name, .. } => file_name.clone(),
            PatternSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| DEFAULT_PATTERN_FILE.to_string()),
        }
    }
}

/// Host shared libraries bind-mounted into the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryMounts {
    pub libssl: PathBuf,
    pub libcrypto: PathBuf,
}

impl LibraryMounts {
    /// Default library locations for a version suffix (e.g. `3` -> `libssl.so.3`)
    pub fn for_version(version: &str) -> Self {
        let dir = Path::new(DEFAULT_LIB_DIR);
        Self {
            libssl: dir.join(format!("libssl.so.{}", version)),
            libcrypto: dir.join(format!("libcrypto.so.{}", version)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_POLL_ATTEMPTS,
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

/// Synthetic traffic to drive through the container once it is running
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficPlan {
    pub url: String,
    pub requests: u32,
    pub interval: Duration,
    /// Wait after the last request so ROC can flush its output
    pub settle: Duration,
}

/// Fully resolved action inputs
#[derive(Debug, Clone)]
pub struct Inputs {
    pub server_url: String,
    pub api_key: String,
    pub pattern: PatternSource,
    pub image: String,
    pub container_name: String,
    pub workspace: Option<PathBuf>,
    pub config_dir: PathBuf,
    pub output_dir: PathBuf,
    pub extra_args: Vec<String>,
    pub libraries: LibraryMounts,
    pub poll: PollSettings,
    pub traffic: Option<TrafficPlan>,
    pub print_output: bool,
}

impl Inputs {
    /// Resolve raw arguments, applying defaults for everything optional
    pub fn resolve(args: &RunArgs) -> Result<Self> {
        let server_url = required(&args.server_url, "server-url")?;
        let api_key = required(&args.api_key, "api-key")?;
        let patterns = required(&args.patterns, "patterns")?;

        // Inline content is passed through untouched, whitespace included
        let inline = args
            .patterns_content
            .as_deref()
            .filter(|c| !c.is_empty());
        let pattern = match inline {
            Some(content) => PatternSource::Inline {
                file_name: Path::new(&patterns)
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| DEFAULT_PATTERN_FILE.to_string()),
                content: content.to_string(),
            },
            None => PatternSource::File(PathBuf::from(patterns)),
        };

        let ssl_version = present(&args.ssl_version).unwrap_or_else(|| DEFAULT_SSL_VERSION.to_string());
        let defaults = LibraryMounts::for_version(&ssl_version);
        let libraries = LibraryMounts {
            libssl: present(&args.libssl_path).map(PathBuf::from).unwrap_or(defaults.libssl),
            libcrypto: present(&args.libcrypto_path).map(PathBuf::from).unwrap_or(defaults.libcrypto),
        };

        let poll = PollSettings {
            max_attempts: parse_or(&args.poll_attempts, "poll-attempts", DEFAULT_POLL_ATTEMPTS)?,
            interval: Duration::from_secs(parse_or(
                &args.poll_interval,
                "poll-interval",
                DEFAULT_POLL_INTERVAL_SECS,
            )?),
        };

        let traffic = match present(&args.traffic_url) {
            Some(url) => Some(TrafficPlan {
                url,
                requests: parse_or(&args.traffic_requests, "traffic-requests", DEFAULT_TRAFFIC_REQUESTS)?,
                interval: Duration::from_secs(parse_or(
                    &args.traffic_interval,
                    "traffic-interval",
                    DEFAULT_TRAFFIC_INTERVAL_SECS,
                )?),
                settle: Duration::from_secs(parse_or(&args.settle_time, "settle-time", DEFAULT_SETTLE_SECS)?),
            }),
            None => None,
        };

        Ok(Self {
            server_url,
            api_key,
            pattern,
            image: present(&args.image).unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            container_name: present(&args.container_name)
                .unwrap_or_else(|| DEFAULT_CONTAINER_NAME.to_string()),
            workspace: args
                .workspace
                .clone()
                .filter(|p| !p.as_os_str().is_empty()),
            config_dir: PathBuf::from(
                present(&args.config_dir).unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string()),
            ),
            output_dir: PathBuf::from(
                present(&args.output_dir).unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ),
            extra_args: split_extra_args(args.extra_args.as_deref()),
            libraries,
            poll,
            traffic,
            print_output: args.print_output,
        })
    }
}

/// Split free-form extra arguments on whitespace
pub fn split_extra_args(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// The runner exports declared-but-unset inputs as empty strings
fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    present(value).ok_or_else(|| RocError::MissingInput(name.to_string()))
}

fn parse_or<T>(value: &Option<String>, name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match present(value) {
        Some(raw) => raw.parse().map_err(|e: T::Err| RocError::InvalidInput {
            name: name.to_string(),
            reason: format!("'{}': {}", raw, e),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> RunArgs {
        RunArgs {
            server_url: Some("https://x".to_string()),
            api_key: Some("k".to_string()),
            patterns: Some("p.yaml".to_string()),
            patterns_content: Some("a: 1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let inputs = Inputs::resolve(&base_args()).unwrap();
        assert_eq!(inputs.image, DEFAULT_IMAGE);
        assert_eq!(inputs.container_name, DEFAULT_CONTAINER_NAME);
        assert_eq!(inputs.config_dir, PathBuf::from(DEFAULT_CONFIG_DIR));
        assert_eq!(inputs.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(inputs.poll, PollSettings::default());
        assert!(inputs.extra_args.is_empty());
        assert!(inputs.traffic.is_none());
        assert_eq!(
            inputs.libraries.libssl,
            PathBuf::from("/usr/lib/x86_64-linux-gnu/libssl.so.3")
        );
        assert_eq!(
            inputs.pattern,
            PatternSource::Inline {
                file_name: "p.yaml".to_string(),
                content: "a: 1".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_required_inputs() {
        for field in ["server-url", "api-key", "patterns"] {
            let mut args = base_args();
            match field {
                "server-url" => args.server_url = None,
                "api-key" => args.api_key = None,
                _ => args.patterns = None,
            }
            match Inputs::resolve(&args) {
                Err(RocError::MissingInput(name)) => assert_eq!(name, field),
                other => panic!("expected MissingInput({}), got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_empty_input_counts_as_missing() {
        let mut args = base_args();
        args.api_key = Some("   ".to_string());
        assert!(matches!(
            Inputs::resolve(&args),
            Err(RocError::MissingInput(ref name)) if name == "api-key"
        ));

        args = base_args();
        args.image = Some(String::new());
        assert_eq!(Inputs::resolve(&args).unwrap().image, DEFAULT_IMAGE);
    }

    #[test]
    fn test_pattern_file_source() {
        let mut args = base_args();
        args.patterns = Some("config/roc/patterns.yml".to_string());
        args.patterns_content = None;
        let inputs = Inputs::resolve(&args).unwrap();
        assert_eq!(
            inputs.pattern,
            PatternSource::File(PathBuf::from("config/roc/patterns.yml"))
        );
        assert_eq!(inputs.pattern.file_name(), "patterns.yml");
    }

    #[test]
    fn test_inline_content_is_not_trimmed() {
        let mut args = base_args();
        args.patterns_content = Some("rules:\n  - a\n".to_string());
        let inputs = Inputs::resolve(&args).unwrap();
        match inputs.pattern {
            PatternSource::Inline { content, .. } => assert_eq!(content, "rules:\n  - a\n"),
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_only_content_is_still_inline() {
        let mut args = base_args();
        args.patterns_content = Some("\n".to_string());
        let inputs = Inputs::resolve(&args).unwrap();
        assert_eq!(
            inputs.pattern,
            PatternSource::Inline {
                file_name: "p.yaml".to_string(),
                content: "\n".to_string(),
            }
        );

        args.patterns_content = Some(String::new());
        let inputs = Inputs::resolve(&args).unwrap();
        assert!(matches!(inputs.pattern, PatternSource::File(_)));
    }

    #[test]
    fn test_library_overrides() {
        let mut args = base_args();
        args.ssl_version = Some("1.1".to_string());
        args.libcrypto_path = Some("/opt/ssl/libcrypto.so".to_string());
        let inputs = Inputs::resolve(&args).unwrap();
        assert_eq!(
            inputs.libraries.libssl,
            PathBuf::from("/usr/lib/x86_64-linux-gnu/libssl.so.1.1")
        );
        assert_eq!(inputs.libraries.libcrypto, PathBuf::from("/opt/ssl/libcrypto.so"));
    }

    #[test]
    fn test_extra_args_split() {
        assert_eq!(
            split_extra_args(Some("  --verbose   --max-events 5 ")),
            vec!["--verbose", "--max-events", "5"]
        );
        assert!(split_extra_args(None).is_empty());
    }

    #[test]
    fn test_invalid_number() {
        let mut args = base_args();
        args.poll_attempts = Some("many".to_string());
        assert!(matches!(
            Inputs::resolve(&args),
            Err(RocError::InvalidInput { ref name, .. }) if name == "poll-attempts"
        ));
    }

    #[test]
    fn test_traffic_plan() {
        let mut args = base_args();
        args.traffic_url = Some("https://example.com".to_string());
        args.traffic_requests = Some("3".to_string());
        let plan = Inputs::resolve(&args).unwrap().traffic.unwrap();
        assert_eq!(plan.url, "https://example.com");
        assert_eq!(plan.requests, 3);
        assert_eq!(plan.interval, Duration::from_secs(DEFAULT_TRAFFIC_INTERVAL_SECS));
        assert_eq!(plan.settle, Duration::from_secs(DEFAULT_SETTLE_SECS));
    }
}
