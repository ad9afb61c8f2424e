//! Train command: the full pipeline from extracts to feature importances.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use headline_alpha_backtest::{report, ImportanceTable, Trainer, TrainingSummary};
use headline_alpha_core::{normalize, PipelineConfig, YearMonth};
use headline_alpha_data::ValidationReport;
use serde::Serialize;

use super::output::{write_importance_csv, write_json, IMPORTANCE_FILE, REPORT_FILE};
use super::pipeline::{load_inputs, prepare};
use super::OutputFormat;

/// Arguments for the train command.
#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Output format: text, json (default: text)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Train/test cutoff date, overriding the config (YYYYMMDD or YYYY-MM-DD)
    #[arg(long)]
    pub cutoff: Option<String>,

    /// Number of features shown in the text report
    #[arg(long, default_value = "20")]
    pub top: usize,
}

/// Everything written to `report.json`.
#[derive(Debug, Serialize)]
struct RunReport {
    scorer: &'static str,
    validation: ValidationReport,
    missing_months: Vec<YearMonth>,
    format_errors: usize,
    joined_rows: usize,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
    training: TrainingSummary,
    importance: ImportanceTable,
}

pub async fn run_train(config: &PipelineConfig, args: TrainArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)?;
    let cutoff = match args.cutoff.as_deref() {
        Some(raw) => normalize(raw).with_context(|| format!("Invalid --cutoff '{raw}'"))?,
        None => config.training.cutoff_date,
    };

    let inputs = load_inputs(config).await?;
    let prepared = prepare(config, inputs)?;

    let model = Trainer::new(config.training.clone())
        .train(&prepared.table, cutoff)
        .context("Training failed")?;
    let importance = report(&model, &model.feature_names);

    let span = prepared.table.date_span();
    let run = RunReport {
        scorer: config.sentiment.scorer.as_str(),
        validation: prepared.validation,
        missing_months: prepared.gaps,
        format_errors: prepared.format_errors,
        joined_rows: prepared.table.len(),
        first_date: span.map(|(first, _)| first),
        last_date: span.map(|(_, last)| last),
        training: model.summary(),
        importance,
    };

    write_importance_csv(&config.output.dir.join(IMPORTANCE_FILE), &run.importance)?;
    write_json(&config.output.dir.join(REPORT_FILE), &run)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&run)?),
        OutputFormat::Text => print!("{}", to_text(&run, args.top)),
    }
    Ok(())
}

fn to_text(run: &RunReport, top: usize) -> String {
    let t = &run.training;
    let mut text = String::new();

    text.push_str("Headline sentiment vs next-day direction\n");
    text.push_str("========================================\n");
    text.push_str(&format!("Scorer:            {}\n", run.scorer));
    text.push_str(&format!(
        "Records:           {} valid, {} dropped\n",
        run.validation.valid, run.validation.dropped
    ));
    text.push_str(&format!("Joined rows:       {}\n", run.joined_rows));
    text.push_str(&format!("Cutoff:            {}\n", t.cutoff));
    text.push_str(&format!(
        "Rows:              {} train, {} test, {} unlabeled\n",
        t.train_rows, t.test_rows, t.unlabeled_rows
    ));

    text.push_str(&format!("\nCross-validation ({} folds):\n", t.cv_folds));
    for score in &t.cv_scores {
        let marker = if score.min_impurity_decrease == t.min_impurity_decrease {
            "*"
        } else {
            " "
        };
        text.push_str(&format!(
            " {marker} min_impurity_decrease={:<8} mean accuracy {:.4}\n",
            score.min_impurity_decrease, score.mean_accuracy
        ));
    }

    text.push_str(&format!("\nTrain accuracy:    {:.4}\n", t.train_accuracy));
    text.push_str(&format!("Test accuracy:     {:.4}\n", t.test_accuracy));
    text.push_str(&format!("Majority baseline: {:.4}\n", t.baseline_accuracy));

    let shown = ImportanceTable {
        rows: run.importance.top(top).to_vec(),
    };
    text.push_str(&format!(
        "\nFeature importance (top {} of {}):\n",
        shown.len(),
        run.importance.len()
    ));
    text.push_str(&shown.to_string());
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use headline_alpha_core::TrainingConfig;
    use headline_alpha_data::{MarketBar, MarketRecord};
    use headline_alpha_signals::{JoinedFeatureTable, JoinedRow};
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn date(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(offset)
    }

    fn run_report() -> RunReport {
        let rows = (0..40u32)
            .map(|i| {
                let mut market = MarketRecord::terminal(MarketBar::from_close(
                    date(u64::from(i)),
                    dec!(100),
                    1_000,
                ));
                market.direction_up_next_1 = Some(i % 4 >= 2);
                JoinedRow {
                    date: date(u64::from(i)),
                    features: vec![f64::from(i % 4), 1.0],
                    market,
                }
            })
            .collect();
        let table = JoinedFeatureTable {
            feature_names: vec!["main_title_compound".into(), "main_content_compound".into()],
            rows,
        };
        let config = TrainingConfig {
            cv_folds: 3,
            min_impurity_decrease_grid: vec![1e-4, 0.9],
            n_trees: 10,
            ..TrainingConfig::default()
        };
        let model = Trainer::new(config).train(&table, date(30)).unwrap();
        let span = table.date_span();

        RunReport {
            scorer: "compound",
            validation: ValidationReport::from_records(&[]),
            missing_months: vec![YearMonth::new(2020, 2).unwrap()],
            format_errors: 0,
            joined_rows: table.len(),
            first_date: span.map(|(first, _)| first),
            last_date: span.map(|(_, last)| last),
            training: model.summary(),
            importance: report(&model, &model.feature_names),
        }
    }

    #[test]
    fn report_json_carries_training_accuracies() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(REPORT_FILE);
        let run = run_report();

        write_json(&path, &run).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(value["training"]["train_accuracy"], run.training.train_accuracy);
        assert_eq!(value["training"]["test_accuracy"], run.training.test_accuracy);
        assert_eq!(value["training"]["train_rows"], 30);
        assert_eq!(value["training"]["test_rows"], 10);
        assert_eq!(value["joined_rows"], 40);
        assert_eq!(value["missing_months"][0]["month"], 2);
        assert_eq!(value["importance"]["rows"][0]["rank"], 1);
        assert_eq!(value["importance"]["rows"][0]["feature"], "main_title_compound");
    }

    #[test]
    fn text_report_limits_importance_rows() {
        let run = run_report();
        let text = to_text(&run, 1);

        assert!(text.contains("Scorer:            compound"));
        assert!(text.contains("Rows:              30 train, 10 test, 0 unlabeled"));
        assert!(text.contains("Feature importance (top 1 of 2)"));
        assert!(text.contains("main_title_compound"));
        assert!(!text.contains("main_content_compound"));
    }
}
