//! Labeled feature matrix for the classifier.

use chrono::NaiveDate;
use headline_alpha_signals::JoinedFeatureTable;
use tracing::{debug, info};

/// Rows of features with a binary next-day direction label.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    /// Feature matrix (n_samples x n_features).
    pub features: Vec<Vec<f64>>,
    /// `true` when the next trading day closed higher.
    pub labels: Vec<bool>,
    pub dates: Vec<NaiveDate>,
}

impl Dataset {
    pub fn new(feature_names: Vec<String>) -> Self {
        Self {
            feature_names,
            features: Vec::new(),
            labels: Vec::new(),
            dates: Vec::new(),
        }
    }

    /// Builds a dataset from joined rows, skipping rows without a label.
    ///
    /// Returns the dataset and the number of rows skipped.
    #[must_use]
    pub fn from_table(table: &JoinedFeatureTable) -> (Self, usize) {
        let mut dataset = Self::new(table.feature_names.clone());
        let mut unlabeled = 0;

        for row in &table.rows {
            match row.market.direction_up_next_1 {
                Some(up) => dataset.push(row.features.clone(), up, row.date),
                None => {
                    debug!(date = %row.date, "Row has no next-day label");
                    unlabeled += 1;
                }
            }
        }

        if unlabeled > 0 {
            info!(
                unlabeled,
                labeled = dataset.n_samples(),
                "Excluded unlabeled rows from the dataset"
            );
        }
        (dataset, unlabeled)
    }

    pub fn push(&mut self, features: Vec<f64>, label: bool, date: NaiveDate) {
        self.features.push(features);
        self.labels.push(label);
        self.dates.push(date);
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Rows at `indices`, in the given order.
    #[must_use]
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            dates: indices.iter().map(|&i| self.dates[i]).collect(),
        }
    }

    /// Most frequent label; ties resolve to `false` (down).
    #[must_use]
    pub fn majority_label(&self) -> bool {
        let ups = self.labels.iter().filter(|&&l| l).count();
        ups * 2 > self.labels.len()
    }
}
