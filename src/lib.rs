//! roc-action - run the ROC network observer in a CI job
//!
//! The action launches a preconfigured ROC container, waits for it to come
//! up, optionally drives HTTP traffic through it, collects its logs and
//! output files, and always removes the container afterwards.
//!
//! # Example
//!
//! ```no_run
//! use roc_action::{ActionRunner, DockerCli, ThreadSleeper};
//! use roc_action::cli::RunArgs;
//!
//! let args = RunArgs {
//!     server_url: Some("https://roc.example.com".to_string()),
//!     api_key: Some("secret".to_string()),
//!     patterns: Some("patterns.yaml".to_string()),
//!     patterns_content: Some("rules: []".to_string()),
//!     workspace: Some(std::env::current_dir().unwrap()),
//!     ..Default::default()
//! };
//! let runtime = DockerCli::default();
//! let report = ActionRunner::new(&runtime, &ThreadSleeper).run(&args).unwrap();
//! println!("{}", report.artifacts.names());
//! ```

pub mod action;
pub mod artifacts;
pub mod cli;
pub mod container;
pub mod error;
pub mod inputs;
pub mod output;
pub mod staging;
pub mod traffic;

pub use action::{ActionRunner, RunReport};
pub use container::{ContainerRuntime, DockerCli, InterruptibleSleeper, Sleeper, ThreadSleeper};
pub use error::{Result, RocError};
pub use inputs::Inputs;
pub use output::{format_output, ActionOutput, OutputFormat};
