//! Output formatting module

pub mod formatter;
pub mod github;
pub mod human;
pub mod json;

pub use formatter::{format_output, ActionOutput, OutputFormat};
