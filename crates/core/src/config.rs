use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::YearMonth;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub corpus: CorpusConfig,
    pub market: MarketConfig,
    pub sentiment: SentimentConfig,
    pub training: TrainingConfig,
    pub output: OutputConfig,
}

/// Where the monthly extracts live and which months to assemble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub extract_dir: PathBuf,
    /// File name prefix; a month's file is `{prefix}{YYYYMM}.csv`.
    pub file_prefix: String,
    pub start: YearMonth,
    pub end: YearMonth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    pub path: PathBuf,
    /// Next-day volume strictly above this marks `volume_large_next_1`.
    pub volume_large_threshold: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    pub scorer: ScorerKind,
}

/// Which sentiment capability to extract per text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Lexicon polarity in [-1, 1] plus subjectivity in [0, 1].
    PolaritySubjectivity,
    /// Single VADER compound score in [-1, 1].
    Compound,
}

impl ScorerKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PolaritySubjectivity => "polarity_subjectivity",
            Self::Compound => "compound",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Rows dated before the cutoff train, rows on or after it test.
    pub cutoff_date: NaiveDate,
    pub cv_folds: usize,
    /// Candidate `min_impurity_decrease` values tried by cross-validation.
    pub min_impurity_decrease_grid: Vec<f64>,
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            corpus: CorpusConfig {
                extract_dir: PathBuf::from("data/extracts"),
                file_prefix: "web_data_".to_string(),
                start: YearMonth {
                    year: 2019,
                    month: 1,
                },
                end: YearMonth {
                    year: 2020,
                    month: 9,
                },
            },
            market: MarketConfig {
                path: PathBuf::from("data/market.csv"),
                volume_large_threshold: 75_000_000,
            },
            sentiment: SentimentConfig {
                scorer: ScorerKind::PolaritySubjectivity,
            },
            training: TrainingConfig::default(),
            output: OutputConfig {
                dir: PathBuf::from("output"),
            },
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            cutoff_date: NaiveDate::from_ymd_opt(2020, 6, 1).unwrap_or_default(),
            cv_folds: 5,
            min_impurity_decrease_grid: vec![0.0001, 0.001, 0.01, 0.1],
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 2,
            seed: 42,
        }
    }
}
