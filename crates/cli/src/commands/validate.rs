//! Validate command: corpus assembly plus snapshot/date consistency report.

use anyhow::Result;
use clap::Args;
use headline_alpha_core::{PipelineConfig, YearMonth};
use headline_alpha_data::{validate_all, ValidationReport};
use serde::Serialize;
use tracing::warn;

use super::pipeline::load_corpus;
use super::OutputFormat;

/// Arguments for the validate command.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Serialize)]
struct ValidateOutput {
    months_loaded: Vec<YearMonth>,
    gaps: Vec<YearMonth>,
    all_valid: bool,
    report: ValidationReport,
}

pub async fn run_validate(config: &PipelineConfig, args: ValidateArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let corpus = load_corpus(config).await?;
    let all_valid = validate_all(&corpus.records);
    let report = ValidationReport::from_records(&corpus.records);

    if !all_valid {
        warn!(
            dropped = report.dropped,
            total = report.total,
            "Corpus contains records whose snapshot does not match the collection date"
        );
    }

    let output = ValidateOutput {
        months_loaded: corpus.months_loaded,
        gaps: corpus.gaps,
        all_valid,
        report,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Text => print!("{}", to_text(&output)),
    }
    Ok(())
}

fn join_months(months: &[YearMonth]) -> String {
    if months.is_empty() {
        return "none".to_string();
    }
    months
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_text(output: &ValidateOutput) -> String {
    let report = &output.report;
    let mut text = String::new();

    text.push_str("Corpus validation\n");
    text.push_str("=================\n");
    text.push_str(&format!("Months loaded:  {}\n", output.months_loaded.len()));
    text.push_str(&format!("Missing months: {}\n", join_months(&output.gaps)));
    text.push_str(&format!("Records:        {}\n", report.total));
    text.push_str(&format!("Valid:          {}\n", report.valid));
    text.push_str(&format!("Dropped:        {}\n", report.dropped));
    if let (Some(first), Some(last)) = (report.first_date, report.last_date) {
        text.push_str(&format!("Date range:     {first} to {last}\n"));
    }

    if !report.sample_drops.is_empty() {
        text.push_str("\nSample of dropped records (collection date / snapshot):\n");
        for drop in &report.sample_drops {
            text.push_str(&format!(
                "  {} / {}\n",
                drop.collection_date, drop.snapshot_timestamp
            ));
        }
    }

    text.push_str(if output.all_valid {
        "\nAll records valid\n"
    } else {
        "\nSome records were dropped\n"
    });
    text
}
