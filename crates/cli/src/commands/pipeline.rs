//! Loading and feature stages shared by the subcommands.

use anyhow::{Context, Result};
use headline_alpha_core::{PipelineConfig, YearMonth};
use headline_alpha_data::{
    filter_valid, Corpus, CorpusAssembler, CsvExtractSource, CsvStorage, MarketBar,
    ValidationReport,
};
use headline_alpha_signals::{
    join, scorer_for, FeatureExtractor, JoinedFeatureTable, MarketFeatureBuilder,
};
use tracing::info;

/// Raw inputs read from disk.
pub struct Inputs {
    pub corpus: Corpus,
    pub bars: Vec<MarketBar>,
}

/// Validated, scored, and labeled data ready for training.
pub struct Prepared {
    pub validation: ValidationReport,
    pub gaps: Vec<YearMonth>,
    /// Records that passed validation but whose date is not a real calendar
    /// day, such as `20200931`. Counted apart from `validation.dropped`.
    pub format_errors: usize,
    pub table: JoinedFeatureTable,
}

/// Assembles the monthly extract corpus on a blocking task.
pub async fn load_corpus(config: &PipelineConfig) -> Result<Corpus> {
    let corpus_config = config.corpus.clone();

    tokio::task::spawn_blocking(move || {
        let source = CsvExtractSource::new(
            corpus_config.extract_dir.clone(),
            corpus_config.file_prefix.clone(),
        );
        CorpusAssembler::new(source)
            .assemble(corpus_config.start, corpus_config.end)
            .with_context(|| {
                format!(
                    "Failed to assemble corpus from {}",
                    corpus_config.extract_dir.display()
                )
            })
    })
    .await
    .context("Corpus loader task failed")?
}

/// Reads the daily market series on a blocking task.
pub async fn load_market(config: &PipelineConfig) -> Result<Vec<MarketBar>> {
    let path = config.market.path.clone();

    tokio::task::spawn_blocking(move || {
        CsvStorage::read_market_bars(&path)
            .with_context(|| format!("Failed to read market series {}", path.display()))
    })
    .await
    .context("Market loader task failed")?
}

/// Reads the corpus and the market series concurrently.
pub async fn load_inputs(config: &PipelineConfig) -> Result<Inputs> {
    let (corpus, bars) = tokio::try_join!(load_corpus(config), load_market(config))?;

    info!(
        records = corpus.len(),
        months = corpus.months_loaded.len(),
        gaps = corpus.gaps.len(),
        bars = bars.len(),
        "Loaded inputs"
    );
    Ok(Inputs { corpus, bars })
}

/// Validates, scores, labels, and joins the inputs.
pub fn prepare(config: &PipelineConfig, inputs: Inputs) -> Result<Prepared> {
    let gaps = inputs.corpus.gaps.clone();
    let records = inputs.corpus.sorted_by_date();

    let validation = ValidationReport::from_records(&records);
    let outcome = filter_valid(records);

    let extractor = FeatureExtractor::new(scorer_for(config.sentiment.scorer));
    let features = extractor.extract_records(&outcome.valid);

    let market = MarketFeatureBuilder::new(config.market.volume_large_threshold).build(&inputs.bars);
    let table = join(&features, &market).context("Failed to align features with market labels")?;

    Ok(Prepared {
        validation,
        gaps,
        format_errors: features.format_errors,
        table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use headline_alpha_data::{TextField, TextRecord};
    use rust_decimal_macros::dec;

    fn record(date: &str, timestamp: &str) -> TextRecord {
        TextRecord::new(date, timestamp).with_field(TextField::MainTitle, "Stocks rally strongly")
    }

    #[test]
    fn validator_drops_and_format_errors_are_counted_apart() {
        let corpus = Corpus {
            records: vec![
                record("20200903", "20200903120000"),
                record("20200901", "20200901120000"),
                record("20200904", "20200905120000"),
                record("20200931", "20200931120000"),
                record("20200902", "20200902120000"),
            ],
            months_loaded: vec![YearMonth::new(2020, 9).unwrap()],
            gaps: Vec::new(),
        };
        let bars = (1..=4)
            .map(|d| {
                MarketBar::from_close(NaiveDate::from_ymd_opt(2020, 9, d).unwrap(), dec!(100), 1)
            })
            .collect();

        let prepared = prepare(&PipelineConfig::default(), Inputs { corpus, bars }).unwrap();

        assert_eq!(prepared.validation.total, 5);
        assert_eq!(prepared.validation.dropped, 1);
        assert_eq!(prepared.format_errors, 1);
        assert_eq!(prepared.table.len(), 3);
        assert_eq!(
            prepared.table.date_span(),
            Some((
                NaiveDate::from_ymd_opt(2020, 9, 1).unwrap(),
                NaiveDate::from_ymd_opt(2020, 9, 3).unwrap()
            ))
        );
    }
}
