pub mod config;
pub mod config_loader;
pub mod dates;

pub use config::{
    CorpusConfig, MarketConfig, OutputConfig, PipelineConfig, ScorerKind, SentimentConfig,
    TrainingConfig,
};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH, ENV_PREFIX};
pub use dates::{normalize, to_compact, FormatError, MonthError, YearMonth};
