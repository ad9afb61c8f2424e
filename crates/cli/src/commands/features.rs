//! Features command: writes the joined sentiment/market table.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use headline_alpha_core::PipelineConfig;

use super::output::{write_features_csv, FEATURES_FILE};
use super::pipeline::{load_inputs, prepare};

/// Arguments for the features command.
#[derive(Args, Debug, Clone)]
pub struct FeaturesArgs {
    /// Output CSV path (default: features.csv in the configured output dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run_features(config: &PipelineConfig, args: FeaturesArgs) -> Result<()> {
    let inputs = load_inputs(config).await?;
    let prepared = prepare(config, inputs)?;

    let path = args
        .output
        .unwrap_or_else(|| config.output.dir.join(FEATURES_FILE));
    write_features_csv(&path, &prepared.table)?;

    println!(
        "Wrote {} rows x {} features to {}",
        prepared.table.len(),
        prepared.table.feature_names.len(),
        path.display()
    );
    if let Some((first, last)) = prepared.table.date_span() {
        println!("Dates: {first} to {last}");
    }
    Ok(())
}
