//! Ranked feature-importance report.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::trainer::TrainedModel;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportanceRow {
    /// 1-based position after sorting.
    pub rank: usize,
    pub feature: String,
    pub importance: f64,
    /// Importance as a percentage of the largest importance.
    pub relative: f64,
}

/// Features sorted by importance, most important first.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ImportanceTable {
    pub rows: Vec<ImportanceRow>,
}

impl ImportanceTable {
    /// Ranks `importances` paired positionally with `feature_names`.
    ///
    /// The sort is stable, so equal importances keep their input order.
    #[must_use]
    pub fn from_importances(feature_names: &[String], importances: &[f64]) -> Self {
        if feature_names.len() != importances.len() {
            warn!(
                names = feature_names.len(),
                importances = importances.len(),
                "Feature names and importances differ in length, extra entries ignored"
            );
        }

        let mut pairs: Vec<(&String, f64)> =
            feature_names.iter().zip(importances.iter().copied()).collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));

        let max = pairs.first().map_or(0.0, |p| p.1);
        let rows = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (name, importance))| ImportanceRow {
                rank: i + 1,
                feature: name.clone(),
                importance,
                relative: if max > 0.0 {
                    importance / max * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Self { rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `n` highest-ranked rows.
    #[must_use]
    pub fn top(&self, n: usize) -> &[ImportanceRow] {
        &self.rows[..n.min(self.rows.len())]
    }
}

impl fmt::Display for ImportanceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.feature.len())
            .max()
            .unwrap_or(0)
            .max("feature".len());

        writeln!(
            f,
            "{:>4}  {:<width$}  {:>10}  {:>8}",
            "rank", "feature", "importance", "relative"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>4}  {:<width$}  {:>10.4}  {:>7.1}%",
                row.rank, row.feature, row.importance, row.relative
            )?;
        }
        Ok(())
    }
}

/// Importance report for a trained model.
#[must_use]
pub fn report(model: &TrainedModel, feature_names: &[String]) -> ImportanceTable {
    ImportanceTable::from_importances(feature_names, model.feature_importances())
}
