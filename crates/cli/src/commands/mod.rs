//! CLI commands for the headline sentiment pipeline.

pub mod features;
pub mod output;
pub mod pipeline;
pub mod train;
pub mod validate;

use anyhow::{anyhow, Result};

pub use features::{run_features, FeaturesArgs};
pub use train::{run_train, TrainArgs};
pub use validate::{run_validate, ValidateArgs};

/// Output format for command reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parses an output format from string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unknown format: '{}'. Valid formats: text, json",
                s
            )),
        }
    }
}
