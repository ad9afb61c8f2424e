use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use headline_alpha_core::{ConfigLoader, DEFAULT_CONFIG_PATH};

mod commands;

use commands::{FeaturesArgs, TrainArgs, ValidateArgs};

#[derive(Parser)]
#[command(name = "headline-alpha")]
#[command(
    about = "Tests whether news homepage sentiment predicts next-day market moves",
    long_about = None
)]
struct Cli {
    /// Pipeline config file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the extract corpus and report snapshot validation results
    Validate(ValidateArgs),
    /// Build the joined sentiment/market feature table and write it as CSV
    Features(FeaturesArgs),
    /// Run the full pipeline: features, cross-validated training, importance report
    Train(TrainArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigLoader::load_from(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;

    match cli.command {
        Commands::Validate(args) => commands::run_validate(&config, args).await?,
        Commands::Features(args) => commands::run_features(&config, args).await?,
        Commands::Train(args) => commands::run_train(&config, args).await?,
    }

    Ok(())
}
