//! Bagged ensemble of classification trees.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::decision_tree::{DecisionTree, TreeParams};
use crate::dataset::Dataset;

/// Random forest configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    /// Per-tree limits. `max_features = None` means `ceil(sqrt(n_features))`.
    pub tree: TreeParams,
    pub bootstrap: bool,
    /// Tree `i` is seeded with `seed + i`.
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            tree: TreeParams::default(),
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestParams {
    #[must_use]
    pub fn with_min_impurity_decrease(mut self, value: f64) -> Self {
        self.tree.min_impurity_decrease = value;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    trees: Vec<DecisionTree>,
    feature_importances: Vec<f64>,
}

impl RandomForest {
    #[must_use]
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
            feature_importances: Vec::new(),
        }
    }

    /// Fits all trees in parallel.
    ///
    /// Each tree owns an RNG seeded from its index, and results are collected
    /// in index order, so the fitted forest does not depend on the number of
    /// worker threads.
    pub fn fit(&mut self, dataset: &Dataset) {
        let n_samples = dataset.n_samples();
        let n_features = dataset.n_features();
        let params = self.params;
        let tree_params = TreeParams {
            max_features: Some(
                params
                    .tree
                    .max_features
                    .unwrap_or_else(|| sqrt_features(n_features)),
            ),
            ..params.tree
        };

        self.trees = (0..params.n_trees)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(params.seed.wrapping_add(i as u64));
                let sample: Vec<usize> = if params.bootstrap && n_samples > 0 {
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };

                let mut tree = DecisionTree::new(tree_params);
                tree.fit(dataset, &sample, &mut rng);
                tree
            })
            .collect();

        let mut importances = vec![0.0; n_features];
        for tree in &self.trees {
            for (total, imp) in importances.iter_mut().zip(tree.feature_importances()) {
                *total += imp;
            }
        }
        let sum: f64 = importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut importances {
                *imp /= sum;
            }
        }
        self.feature_importances = importances;

        debug!(
            n_trees = self.trees.len(),
            n_samples,
            n_features,
            min_impurity_decrease = params.tree.min_impurity_decrease,
            "Fitted random forest"
        );
    }

    #[must_use]
    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Mean of per-tree up probabilities.
    #[must_use]
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }
        self.trees.iter().map(|t| t.predict_proba(row)).sum::<f64>() / self.trees.len() as f64
    }

    /// `true` (up) when the mean probability exceeds 0.5.
    #[must_use]
    pub fn predict(&self, row: &[f64]) -> bool {
        self.predict_proba(row) > 0.5
    }

    #[must_use]
    pub fn predict_dataset(&self, dataset: &Dataset) -> Vec<bool> {
        dataset.features.iter().map(|row| self.predict(row)).collect()
    }

    /// Normalized mean decrease in impurity per feature. All zeros when no
    /// tree split.
    #[must_use]
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }
}

fn sqrt_features(n_features: usize) -> usize {
    ((n_features as f64).sqrt().ceil() as usize).max(1)
}
