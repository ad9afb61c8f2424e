//! CART classification tree with Gini impurity.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    /// Nodes with fewer samples become leaves.
    pub min_samples_split: usize,
    /// A node splits only if its weighted impurity decrease reaches this value.
    pub min_impurity_decrease: f64,
    /// Features sampled per split (None = all).
    pub max_features: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 2,
            min_impurity_decrease: 0.0,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        /// Fraction of samples at this leaf labeled up.
        p_up: f64,
        n_samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        n_samples: usize,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Edges on the longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }
}

/// Binary classification tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    params: TreeParams,
    root: Option<TreeNode>,
    feature_importances: Vec<f64>,
}

impl DecisionTree {
    #[must_use]
    pub fn new(params: TreeParams) -> Self {
        Self {
            params,
            root: None,
            feature_importances: Vec::new(),
        }
    }

    /// Fits the tree on the dataset rows listed in `sample`.
    ///
    /// `sample` may repeat rows (bootstrap). `rng` drives per-split feature
    /// sampling.
    pub fn fit(&mut self, dataset: &Dataset, sample: &[usize], rng: &mut ChaCha8Rng) {
        let mut grower = Grower {
            dataset,
            params: self.params,
            total: sample.len() as f64,
            importances: vec![0.0; dataset.n_features()],
        };
        let root = grower.grow(sample.to_vec(), 0, rng);

        let mut importances = grower.importances;
        let sum: f64 = importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut importances {
                *imp /= sum;
            }
        }

        self.root = Some(root);
        self.feature_importances = importances;
    }

    #[must_use]
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// Probability that `row` is labeled up. An unfitted tree returns 0.5.
    #[must_use]
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let Some(mut node) = self.root.as_ref() else {
            return 0.5;
        };
        loop {
            match node {
                TreeNode::Leaf { p_up, .. } => return *p_up,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    node = if row[*feature] <= *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    /// Normalized impurity-decrease importances; all zero for a single-leaf tree.
    #[must_use]
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// `I - N_l/N_t * I_l - N_r/N_t * I_r`
    decrease: f64,
}

struct Grower<'a> {
    dataset: &'a Dataset,
    params: TreeParams,
    total: f64,
    importances: Vec<f64>,
}

impl Grower<'_> {
    fn grow(&mut self, indices: Vec<usize>, depth: usize, rng: &mut ChaCha8Rng) -> TreeNode {
        let n = indices.len();
        let ups = indices.iter().filter(|&&i| self.dataset.labels[i]).count();
        let impurity = gini(ups, n);
        let leaf = TreeNode::Leaf {
            p_up: if n == 0 { 0.5 } else { ups as f64 / n as f64 },
            n_samples: n,
        };

        if depth >= self.params.max_depth
            || n < self.params.min_samples_split.max(2)
            || impurity <= f64::EPSILON
        {
            return leaf;
        }

        let Some(split) = self.best_split(&indices, ups, impurity, rng) else {
            return leaf;
        };

        let weighted_decrease = n as f64 / self.total * split.decrease;
        if weighted_decrease < self.params.min_impurity_decrease {
            return leaf;
        }
        self.importances[split.feature] += weighted_decrease;

        let dataset = self.dataset;
        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| dataset.features[i][split.feature] <= split.threshold);

        TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            n_samples: n,
            left: Box::new(self.grow(left, depth + 1, rng)),
            right: Box::new(self.grow(right, depth + 1, rng)),
        }
    }

    fn best_split(
        &self,
        indices: &[usize],
        ups: usize,
        impurity: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<SplitCandidate> {
        let n_features = self.dataset.n_features();
        if n_features == 0 {
            return None;
        }
        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(rng);
        features.truncate(self.params.max_features.unwrap_or(n_features).clamp(1, n_features));

        let n = indices.len();
        let mut best: Option<SplitCandidate> = None;

        for feature in features {
            let mut column: Vec<(f64, bool)> = indices
                .iter()
                .map(|&i| (self.dataset.features[i][feature], self.dataset.labels[i]))
                .collect();
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_n = 0;
            let mut left_ups = 0;
            for k in 0..n - 1 {
                left_n += 1;
                if column[k].1 {
                    left_ups += 1;
                }
                let (lo, hi) = (column[k].0, column[k + 1].0);
                if hi <= lo {
                    continue;
                }

                let right_n = n - left_n;
                let children = (left_n as f64 * gini(left_ups, left_n)
                    + right_n as f64 * gini(ups - left_ups, right_n))
                    / n as f64;
                let decrease = impurity - children;

                if decrease > best.as_ref().map_or(0.0, |b| b.decrease) {
                    let mut threshold = (lo + hi) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(SplitCandidate {
                        feature,
                        threshold,
                        decrease,
                    });
                }
            }
        }

        best
    }
}

/// Gini impurity of a binary node: `2p(1 - p)`.
fn gini(ups: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = ups as f64 / n as f64;
    2.0 * p * (1.0 - p)
}
