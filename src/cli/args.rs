//! CLI argument parsing
//!
//! Every action input is both a flag and an environment variable. The env
//! names follow the GitHub Actions runner convention (`INPUT_<NAME>` with the
//! input name upper-cased and hyphens kept).

use clap::builder::FalseyValueParser;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "roc-action")]
#[command(author, version, about = "Run the ROC network observer in a container and collect its output", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubCommand,

    /// Stage files and print the launch command without invoking the runtime
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Container runtime binary
    #[arg(long, global = true, env = "ROC_DOCKER", default_value = "docker")]
    pub docker: String,
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Launch ROC, wait for it, optionally drive traffic, collect output, clean up
    Run(RunArgs),

    /// Stop and remove the ROC container
    Cleanup {
        /// Name of the container to remove
        #[arg(long, env = "INPUT_CONTAINER-NAME")]
        container_name: Option<String>,
    },

    /// List files ROC wrote to the output directory
    Collect {
        /// Host output directory (relative to the workspace)
        #[arg(long, env = "INPUT_OUTPUT-DIR")]
        output_dir: Option<String>,

        /// Workspace root
        #[arg(long, env = "GITHUB_WORKSPACE")]
        workspace: Option<PathBuf>,

        /// Include file contents
        #[arg(long, env = "INPUT_PRINT-OUTPUT", value_parser = FalseyValueParser::new())]
        print_output: bool,
    },
}

/// Raw inputs for the `run` command, resolved by [`crate::inputs::Inputs::resolve`]
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RunArgs {
    /// ROC server URL
    #[arg(long, env = "INPUT_SERVER-URL")]
    pub server_url: Option<String>,

    /// ROC API key
    #[arg(long, env = "INPUT_API-KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Pattern file path, or the file name to use with --patterns-content
    #[arg(long, env = "INPUT_PATTERNS")]
    pub patterns: Option<String>,

    /// Inline pattern content
    #[arg(long, env = "INPUT_PATTERNS-CONTENT")]
    pub patterns_content: Option<String>,

    /// ROC image reference
    #[arg(long, env = "INPUT_IMAGE")]
    pub image: Option<String>,

    /// Container name used for every runtime call
    #[arg(long, env = "INPUT_CONTAINER-NAME")]
    pub container_name: Option<String>,

    /// Host config directory (relative to the workspace)
    #[arg(long, env = "INPUT_CONFIG-DIR")]
    pub config_dir: Option<String>,

    /// Host output directory (relative to the workspace)
    #[arg(long, env = "INPUT_OUTPUT-DIR")]
    pub output_dir: Option<String>,

    /// Extra flags passed through to ROC, space separated
    #[arg(long, env = "INPUT_EXTRA-ARGS", allow_hyphen_values = true)]
    pub extra_args: Option<String>,

    /// Shared library version suffix
    #[arg(long, env = "INPUT_SSL-VERSION")]
    pub ssl_version: Option<String>,

    /// Host path of libssl
    #[arg(long, env = "INPUT_LIBSSL-PATH")]
    pub libssl_path: Option<String>,

    /// Host path of libcrypto
    #[arg(long, env = "INPUT_LIBCRYPTO-PATH")]
    pub libcrypto_path: Option<String>,

    /// Maximum number of status polls
    #[arg(long, env = "INPUT_POLL-ATTEMPTS")]
    pub poll_attempts: Option<String>,

    /// Seconds between status polls
    #[arg(long, env = "INPUT_POLL-INTERVAL")]
    pub poll_interval: Option<String>,

    /// URL to request from inside the container
    #[arg(long, env = "INPUT_TRAFFIC-URL")]
    pub traffic_url: Option<String>,

    /// Number of traffic requests
    #[arg(long, env = "INPUT_TRAFFIC-REQUESTS")]
    pub traffic_requests: Option<String>,

    /// Seconds between traffic requests
    #[arg(long, env = "INPUT_TRAFFIC-INTERVAL")]
    pub traffic_interval: Option<String>,

    /// Seconds to wait after traffic before reading logs
    #[arg(long, env = "INPUT_SETTLE-TIME")]
    pub settle_time: Option<String>,

    /// Include output file contents in the report
    #[arg(long, env = "INPUT_PRINT-OUTPUT", value_parser = FalseyValueParser::new())]
    pub print_output: bool,

    /// Workspace root
    #[arg(long, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// File receiving step outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,
}
