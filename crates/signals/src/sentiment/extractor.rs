//! Field-wise sentiment feature extraction.

use chrono::NaiveDate;
use headline_alpha_data::{TextField, TextRecord};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{SentimentScore, SentimentScorer};

/// Sentiment features for one collection date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentFeatureVector {
    pub date: NaiveDate,
    /// One value per (field, dimension), fields in [`TextField::ALL`] order.
    pub values: Vec<f64>,
}

/// Feature vectors plus the column names that describe them.
#[derive(Debug, Clone, Default)]
pub struct FeatureFrame {
    pub feature_names: Vec<String>,
    pub vectors: Vec<SentimentFeatureVector>,
    /// Records skipped because their collection date did not normalize.
    pub format_errors: usize,
}

impl FeatureFrame {
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Applies a [`SentimentScorer`] to every text field of every record.
pub struct FeatureExtractor {
    scorer: Box<dyn SentimentScorer>,
}

impl FeatureExtractor {
    pub fn new(scorer: Box<dyn SentimentScorer>) -> Self {
        Self { scorer }
    }

    /// Scores a single text.
    #[must_use]
    pub fn extract(&self, text: Option<&str>) -> SentimentScore {
        self.scorer.score(text)
    }

    /// Column names: `{field}_{dimension}` for every field and dimension.
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        TextField::ALL
            .iter()
            .flat_map(|field| {
                self.scorer
                    .dimensions()
                    .iter()
                    .map(move |dim| format!("{}_{}", field.column(), dim))
            })
            .collect()
    }

    /// Feature vector for one record, or `None` if its date is malformed.
    #[must_use]
    pub fn extract_record(&self, record: &TextRecord) -> Option<SentimentFeatureVector> {
        let date = match record.collection_day() {
            Ok(date) => date,
            Err(e) => {
                warn!(error = %e, "Skipping record with malformed collection date");
                return None;
            }
        };

        let values = TextField::ALL
            .iter()
            .flat_map(|field| self.extract(record.fields.get(*field)).values())
            .collect();

        Some(SentimentFeatureVector { date, values })
    }

    /// Extracts features from all records, in input order.
    ///
    /// Records with a malformed collection date are skipped and counted in
    /// [`FeatureFrame::format_errors`]; they never abort the batch.
    #[must_use]
    pub fn extract_records(&self, records: &[TextRecord]) -> FeatureFrame {
        let mut frame = FeatureFrame {
            feature_names: self.feature_names(),
            ..FeatureFrame::default()
        };

        for record in records {
            match self.extract_record(record) {
                Some(vector) => frame.vectors.push(vector),
                None => frame.format_errors += 1,
            }
        }

        info!(
            records = records.len(),
            vectors = frame.vectors.len(),
            features = frame.feature_names.len(),
            format_errors = frame.format_errors,
            "Extracted sentiment features"
        );
        frame
    }
}
