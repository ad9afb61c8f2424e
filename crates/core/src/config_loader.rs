use std::path::Path;

use crate::config::PipelineConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

/// Default location of the pipeline configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/Pipeline.toml";

/// Prefix for environment overrides, e.g. `HEADLINE_TRAINING__CV_FOLDS=3`.
pub const ENV_PREFIX: &str = "HEADLINE_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from [`DEFAULT_CONFIG_PATH`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be parsed.
    pub fn load() -> Result<PipelineConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads configuration by layering built-in defaults, the TOML file at
    /// `path` (skipped if absent), and `HEADLINE_` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an override cannot be parsed into
    /// [`PipelineConfig`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<PipelineConfig> {
        let config: PipelineConfig = Self::figment(path.as_ref()).extract()?;

        tracing::debug!(
            path = %path.as_ref().display(),
            scorer = config.sentiment.scorer.as_str(),
            cutoff = %config.training.cutoff_date,
            "Loaded pipeline configuration"
        );

        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(PipelineConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScorerKind;
    use crate::dates::YearMonth;
    use chrono::NaiveDate;
    use figment::Jail;

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load_from("absent.toml").map_err(|e| e.to_string())?;

            assert_eq!(config.corpus.file_prefix, "web_data_");
            assert_eq!(config.market.volume_large_threshold, 75_000_000);
            assert_eq!(config.sentiment.scorer, ScorerKind::PolaritySubjectivity);
            assert_eq!(config.training.cv_folds, 5);
            Ok(())
        });
    }

    #[test]
    fn toml_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Pipeline.toml",
                r#"
                [corpus]
                start = { year = 2020, month = 1 }
                end = { year = 2020, month = 3 }

                [sentiment]
                scorer = "compound"

                [training]
                cutoff_date = "2020-02-15"
                min_impurity_decrease_grid = [0.001, 0.01]
                "#,
            )?;

            let config = ConfigLoader::load_from("Pipeline.toml").map_err(|e| e.to_string())?;

            assert_eq!(config.corpus.start, YearMonth::new(2020, 1).unwrap());
            assert_eq!(config.corpus.end, YearMonth::new(2020, 3).unwrap());
            assert_eq!(config.sentiment.scorer, ScorerKind::Compound);
            assert_eq!(
                config.training.cutoff_date,
                NaiveDate::from_ymd_opt(2020, 2, 15).unwrap()
            );
            assert_eq!(config.training.min_impurity_decrease_grid, vec![0.001, 0.01]);
            // untouched keys keep their defaults
            assert_eq!(config.training.n_trees, 100);
            assert_eq!(config.corpus.file_prefix, "web_data_");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Pipeline.toml",
                r#"
                [training]
                cv_folds = 10
                "#,
            )?;
            jail.set_env("HEADLINE_TRAINING__CV_FOLDS", "3");
            jail.set_env("HEADLINE_MARKET__VOLUME_LARGE_THRESHOLD", "1000");

            let config = ConfigLoader::load_from("Pipeline.toml").map_err(|e| e.to_string())?;

            assert_eq!(config.training.cv_folds, 3);
            assert_eq!(config.market.volume_large_threshold, 1000);
            Ok(())
        });
    }

    #[test]
    fn unknown_scorer_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Pipeline.toml",
                r#"
                [sentiment]
                scorer = "bag_of_words"
                "#,
            )?;

            assert!(ConfigLoader::load_from("Pipeline.toml").is_err());
            Ok(())
        });
    }
}
