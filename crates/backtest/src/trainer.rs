//! End-to-end model fitting: split, tune, fit, evaluate.

use chrono::NaiveDate;
use headline_alpha_core::TrainingConfig;
use headline_alpha_signals::JoinedFeatureTable;
use serde::Serialize;
use tracing::info;

use crate::cross_validation::{grid_search, CandidateScore};
use crate::dataset::Dataset;
use crate::error::{Partition, TrainError};
use crate::forest::{ForestParams, RandomForest, TreeParams};
use crate::metrics::{accuracy, constant_accuracy};
use crate::split::temporal_split;

/// A forest fitted on the train partition and scored on the test partition.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub forest: RandomForest,
    pub feature_names: Vec<String>,
    pub cutoff: NaiveDate,
    /// Grid value chosen by cross-validation.
    pub min_impurity_decrease: f64,
    pub cv_folds: usize,
    pub cv_scores: Vec<CandidateScore>,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    /// Test accuracy of always predicting the train majority class.
    pub baseline_accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Joined rows without a next-day label.
    pub unlabeled_rows: usize,
}

impl TrainedModel {
    #[must_use]
    pub fn feature_importances(&self) -> &[f64] {
        self.forest.feature_importances()
    }

    #[must_use]
    pub fn summary(&self) -> TrainingSummary {
        TrainingSummary {
            cutoff: self.cutoff,
            min_impurity_decrease: self.min_impurity_decrease,
            cv_folds: self.cv_folds,
            cv_scores: self.cv_scores.clone(),
            train_accuracy: self.train_accuracy,
            test_accuracy: self.test_accuracy,
            baseline_accuracy: self.baseline_accuracy,
            train_rows: self.train_rows,
            test_rows: self.test_rows,
            unlabeled_rows: self.unlabeled_rows,
            n_trees: self.forest.trees().len(),
        }
    }
}

/// Serializable view of a [`TrainedModel`] without the trees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub cutoff: NaiveDate,
    pub min_impurity_decrease: f64,
    pub cv_folds: usize,
    pub cv_scores: Vec<CandidateScore>,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    pub baseline_accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub unlabeled_rows: usize,
    pub n_trees: usize,
}

pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    #[must_use]
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Checks the configuration before any fitting.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<(), TrainError> {
        let c = &self.config;
        if c.n_trees == 0 {
            return Err(TrainError::InvalidConfig("n_trees must be positive".into()));
        }
        if c.cv_folds < 2 {
            return Err(TrainError::InvalidConfig(format!(
                "cv_folds must be at least 2, got {}",
                c.cv_folds
            )));
        }
        if c.min_impurity_decrease_grid.is_empty() {
            return Err(TrainError::InvalidConfig(
                "min_impurity_decrease grid is empty".into(),
            ));
        }
        if let Some(bad) = c
            .min_impurity_decrease_grid
            .iter()
            .find(|v| !v.is_finite() || **v < 0.0)
        {
            return Err(TrainError::InvalidConfig(format!(
                "min_impurity_decrease must be a non-negative number, got {bad}"
            )));
        }
        Ok(())
    }

    fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_trees: self.config.n_trees,
            tree: TreeParams {
                max_depth: self.config.max_depth,
                min_samples_split: self.config.min_samples_split,
                min_impurity_decrease: 0.0,
                max_features: None,
            },
            bootstrap: true,
            seed: self.config.seed,
        }
    }

    /// Tunes, fits, and evaluates a forest on `table` split at `cutoff`.
    ///
    /// Cross-validation only ever sees rows dated before `cutoff`.
    ///
    /// # Errors
    ///
    /// - [`TrainError::InvalidConfig`] if the configuration is unusable
    /// - [`TrainError::TrainingDataExhaustion`] if either partition has no
    ///   labeled rows
    /// - [`TrainError::InsufficientSamples`] if the train partition has
    ///   fewer than 2 rows
    pub fn train(
        &self,
        table: &JoinedFeatureTable,
        cutoff: NaiveDate,
    ) -> Result<TrainedModel, TrainError> {
        self.validate()?;

        let split = temporal_split(table, cutoff);
        let (train, train_unlabeled) = Dataset::from_table(&split.train);
        let (test, test_unlabeled) = Dataset::from_table(&split.test);

        if train.is_empty() {
            return Err(TrainError::TrainingDataExhaustion {
                partition: Partition::Train,
            });
        }
        if test.is_empty() {
            return Err(TrainError::TrainingDataExhaustion {
                partition: Partition::Test,
            });
        }

        let base = self.forest_params();
        let search = grid_search(
            &train,
            base,
            &self.config.min_impurity_decrease_grid,
            self.config.cv_folds,
        )?;
        let chosen = search.best().min_impurity_decrease;

        let mut forest = RandomForest::new(base.with_min_impurity_decrease(chosen));
        forest.fit(&train);

        let train_accuracy = accuracy(&forest.predict_dataset(&train), &train.labels);
        let test_accuracy = accuracy(&forest.predict_dataset(&test), &test.labels);
        let baseline_accuracy = constant_accuracy(train.majority_label(), &test.labels);

        info!(
            %cutoff,
            train_rows = train.n_samples(),
            test_rows = test.n_samples(),
            min_impurity_decrease = chosen,
            train_accuracy,
            test_accuracy,
            baseline_accuracy,
            "Trained direction classifier"
        );

        Ok(TrainedModel {
            feature_names: table.feature_names.clone(),
            cutoff,
            min_impurity_decrease: chosen,
            cv_folds: search.folds,
            cv_scores: search.scores,
            train_accuracy,
            test_accuracy,
            baseline_accuracy,
            train_rows: train.n_samples(),
            test_rows: test.n_samples(),
            unlabeled_rows: train_unlabeled + test_unlabeled,
            forest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headline_alpha_data::{MarketBar, MarketRecord};
    use headline_alpha_signals::JoinedRow;
    use rust_decimal_macros::dec;

    fn config(grid: Vec<f64>) -> TrainingConfig {
        TrainingConfig {
            cv_folds: 3,
            min_impurity_decrease_grid: grid,
            n_trees: 15,
            ..TrainingConfig::default()
        }
    }

    fn date(offset: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + chrono::Days::new(u64::from(offset))
    }

    /// Rows on consecutive days; `label(i)` of `None` leaves row `i` unlabeled.
    fn table(n: u32, label: impl Fn(u32) -> Option<bool>) -> JoinedFeatureTable {
        let rows = (0..n)
            .map(|i| {
                let mut market =
                    MarketRecord::terminal(MarketBar::from_close(date(i), dec!(100), 1_000));
                market.direction_up_next_1 = label(i);
                JoinedRow {
                    date: date(i),
                    features: vec![f64::from(i % 10), f64::from((i * 3) % 7)],
                    market,
                }
            })
            .collect();
        JoinedFeatureTable {
            feature_names: vec!["main_title_compound".into(), "main_content_compound".into()],
            rows,
        }
    }

    fn signal(i: u32) -> Option<bool> {
        Some(i % 10 >= 5)
    }

    #[test]
    fn trains_and_scores_both_partitions() {
        let input = table(90, signal);
        let model = Trainer::new(config(vec![1e-4, 1e-2, 0.9]))
            .train(&input, date(60))
            .unwrap();

        assert_eq!(model.train_rows, 60);
        assert_eq!(model.test_rows, 30);
        assert_eq!(model.unlabeled_rows, 0);
        assert_eq!(model.cv_scores.len(), 3);
        assert_ne!(model.min_impurity_decrease, 0.9);
        assert!(model.test_accuracy > model.baseline_accuracy);
        assert!((0.0..=1.0).contains(&model.train_accuracy));
        assert_eq!(model.feature_importances().len(), 2);
        assert!(model.feature_importances()[0] > model.feature_importances()[1]);
    }

    #[test]
    fn unlabeled_rows_are_counted_not_trained_on() {
        let input = table(40, |i| if i == 39 { None } else { signal(i) });
        let model = Trainer::new(config(vec![1e-3])).train(&input, date(30)).unwrap();

        assert_eq!(model.unlabeled_rows, 1);
        assert_eq!(model.train_rows + model.test_rows, 39);
    }

    #[test]
    fn cutoff_before_all_rows_exhausts_train() {
        let err = Trainer::new(config(vec![1e-3]))
            .train(&table(20, signal), date(0))
            .unwrap_err();
        assert_eq!(
            err,
            TrainError::TrainingDataExhaustion {
                partition: Partition::Train
            }
        );
    }

    #[test]
    fn cutoff_after_all_rows_exhausts_test() {
        let err = Trainer::new(config(vec![1e-3]))
            .train(&table(20, signal), date(100))
            .unwrap_err();
        assert_eq!(
            err,
            TrainError::TrainingDataExhaustion {
                partition: Partition::Test
            }
        );
    }

    #[test]
    fn single_train_row_cannot_be_cross_validated() {
        let err = Trainer::new(config(vec![1e-3]))
            .train(&table(20, signal), date(1))
            .unwrap_err();
        assert_eq!(err, TrainError::InsufficientSamples { found: 1 });
    }

    #[test]
    fn invalid_configs_are_rejected_up_front() {
        let input = table(20, signal);
        let cases = [
            TrainingConfig {
                n_trees: 0,
                ..config(vec![1e-3])
            },
            TrainingConfig {
                cv_folds: 1,
                ..config(vec![1e-3])
            },
            config(vec![]),
            config(vec![-1.0]),
            config(vec![f64::NAN]),
        ];

        for c in cases {
            assert!(matches!(
                Trainer::new(c).train(&input, date(10)),
                Err(TrainError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn pruned_model_matches_majority_baseline() {
        // 3 of every 4 days are up, so every single-leaf tree leans up.
        let input = table(80, |i| Some(i % 4 != 0));
        let model = Trainer::new(config(vec![0.9])).train(&input, date(40)).unwrap();

        assert!(model.feature_importances().iter().all(|v| *v == 0.0));
        assert_eq!(model.test_accuracy, model.baseline_accuracy);
        assert!((model.test_accuracy - 0.75).abs() < 1e-12);
    }

    #[test]
    fn summary_serializes_without_trees() {
        let model = Trainer::new(config(vec![1e-3]))
            .train(&table(30, signal), date(20))
            .unwrap();
        let json = serde_json::to_value(model.summary()).unwrap();

        assert_eq!(json["train_rows"], 20);
        assert_eq!(json["n_trees"], 15);
        assert_eq!(json["cutoff"], "2020-01-21");
        assert!(json.get("forest").is_none());
    }
}
