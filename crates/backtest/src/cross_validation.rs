//! Contiguous k-fold cross-validation over a `min_impurity_decrease` grid.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::error::TrainError;
use crate::forest::{ForestParams, RandomForest};
use crate::metrics::accuracy;

/// Row indices for one fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Splits `0..n` into `k` contiguous folds without shuffling.
///
/// The first `n % k` folds hold one extra row. Each row is held out exactly
/// once. `k` above `n` yields empty test folds; `k == 0` yields no folds.
#[must_use]
pub fn kfold(n: usize, k: usize) -> Vec<Fold> {
    if k == 0 {
        return Vec::new();
    }

    let base = n / k;
    let extra = n % k;
    let mut start = 0;

    (0..k)
        .map(|fold| {
            let size = base + usize::from(fold < extra);
            let end = start + size;
            let test: Vec<usize> = (start..end).collect();
            let train: Vec<usize> = (0..start).chain(end..n).collect();
            start = end;
            Fold { train, test }
        })
        .collect()
}

/// Cross-validated accuracy of one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub min_impurity_decrease: f64,
    pub fold_accuracies: Vec<f64>,
    pub mean_accuracy: f64,
}

/// Scores for every candidate and the index of the winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSearch {
    pub folds: usize,
    pub scores: Vec<CandidateScore>,
    pub best_index: usize,
}

impl GridSearch {
    #[must_use]
    pub fn best(&self) -> &CandidateScore {
        &self.scores[self.best_index]
    }
}

/// Per-fold accuracy of a forest with `params`.
#[must_use]
pub fn cross_validate(dataset: &Dataset, params: ForestParams, folds: &[Fold]) -> Vec<f64> {
    folds
        .iter()
        .map(|fold| {
            let train = dataset.subset(&fold.train);
            let test = dataset.subset(&fold.test);
            let mut forest = RandomForest::new(params);
            forest.fit(&train);
            accuracy(&forest.predict_dataset(&test), &test.labels)
        })
        .collect()
}

/// Picks the grid value with the best mean CV accuracy.
///
/// Ties go to the earlier grid entry. `folds` is clamped to the number of
/// rows.
///
/// # Errors
///
/// Returns [`TrainError::InvalidConfig`] for an empty grid or fewer than 2
/// folds, and [`TrainError::InsufficientSamples`] for fewer than 2 rows.
pub fn grid_search(
    dataset: &Dataset,
    base: ForestParams,
    grid: &[f64],
    folds: usize,
) -> Result<GridSearch, TrainError> {
    if grid.is_empty() {
        return Err(TrainError::InvalidConfig(
            "min_impurity_decrease grid is empty".to_string(),
        ));
    }
    if folds < 2 {
        return Err(TrainError::InvalidConfig(format!(
            "cv_folds must be at least 2, got {folds}"
        )));
    }
    let n = dataset.n_samples();
    if n < 2 {
        return Err(TrainError::InsufficientSamples { found: n });
    }

    let k = folds.min(n);
    let splits = kfold(n, k);

    let mut scores = Vec::with_capacity(grid.len());
    let mut best_index = 0;
    for (i, &value) in grid.iter().enumerate() {
        let fold_accuracies =
            cross_validate(dataset, base.with_min_impurity_decrease(value), &splits);
        let mean_accuracy = fold_accuracies.iter().sum::<f64>() / fold_accuracies.len() as f64;
        debug!(
            min_impurity_decrease = value,
            mean_accuracy, "Scored grid candidate"
        );

        let best_so_far = scores
            .get(best_index)
            .map_or(f64::NEG_INFINITY, |s: &CandidateScore| s.mean_accuracy);
        if mean_accuracy > best_so_far {
            best_index = i;
        }
        scores.push(CandidateScore {
            min_impurity_decrease: value,
            fold_accuracies,
            mean_accuracy,
        });
    }

    let search = GridSearch {
        folds: k,
        scores,
        best_index,
    };
    info!(
        folds = k,
        candidates = grid.len(),
        best = search.best().min_impurity_decrease,
        mean_accuracy = search.best().mean_accuracy,
        "Cross-validation complete"
    );
    Ok(search)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dataset(n: u32) -> Dataset {
        let mut ds = Dataset::new(vec!["signal".to_string(), "noise".to_string()]);
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        for i in 0..n {
            let x = f64::from(i % 10);
            ds.push(vec![x, f64::from((i * 7) % 4)], x >= 5.0, date);
        }
        ds
    }

    fn small_forest() -> ForestParams {
        ForestParams {
            n_trees: 10,
            ..ForestParams::default()
        }
    }

    #[test]
    fn folds_are_contiguous_and_cover_every_row_once() {
        let folds = kfold(11, 3);
        let sizes: Vec<usize> = folds.iter().map(|f| f.test.len()).collect();
        assert_eq!(sizes, vec![4, 4, 3]);
        assert_eq!(folds[1].test, vec![4, 5, 6, 7]);
        assert_eq!(folds[1].train, vec![0, 1, 2, 3, 8, 9, 10]);

        let mut held_out: Vec<usize> = folds.iter().flat_map(|f| f.test.clone()).collect();
        held_out.sort_unstable();
        assert_eq!(held_out, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn one_row_per_fold_at_the_limit() {
        let folds = kfold(3, 3);
        assert!(folds.iter().all(|f| f.test.len() == 1 && f.train.len() == 2));
    }

    #[test]
    fn ties_go_to_the_earlier_candidate() {
        // Both values exceed any achievable Gini decrease, so every candidate
        // is the same single-leaf model.
        let ds = dataset(40);
        let search = grid_search(&ds, small_forest(), &[0.6, 0.9], 5).unwrap();
        assert_eq!(search.scores[0].mean_accuracy, search.scores[1].mean_accuracy);
        assert_eq!(search.best().min_impurity_decrease, 0.6);

        let reversed = grid_search(&ds, small_forest(), &[0.9, 0.6], 5).unwrap();
        assert_eq!(reversed.best().min_impurity_decrease, 0.9);
    }

    #[test]
    fn best_candidate_has_the_highest_mean() {
        let ds = dataset(60);
        let search = grid_search(&ds, small_forest(), &[0.9, 1e-4], 3).unwrap();

        assert_eq!(search.scores.len(), 2);
        assert_eq!(search.folds, 3);
        assert_eq!(search.best_index, 1);
        let best = search.best().mean_accuracy;
        assert!(search.scores.iter().all(|s| s.mean_accuracy <= best));
    }

    #[test]
    fn zero_folds_is_empty_not_a_panic() {
        assert!(kfold(10, 0).is_empty());
        assert!(kfold(0, 0).is_empty());
    }

    #[test]
    fn folds_clamp_to_row_count() {
        let ds = dataset(3);
        let search = grid_search(&ds, small_forest(), &[1e-3], 5).unwrap();
        assert_eq!(search.folds, 3);
        assert_eq!(search.scores[0].fold_accuracies.len(), 3);
    }

    #[test]
    fn rejects_degenerate_inputs() {
        assert_eq!(
            grid_search(&dataset(1), small_forest(), &[1e-3], 5),
            Err(TrainError::InsufficientSamples { found: 1 })
        );
        assert!(matches!(
            grid_search(&dataset(10), small_forest(), &[], 5),
            Err(TrainError::InvalidConfig(_))
        ));
        assert!(matches!(
            grid_search(&dataset(10), small_forest(), &[1e-3], 1),
            Err(TrainError::InvalidConfig(_))
        ));
    }
}
