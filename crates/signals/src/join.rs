//! Inner join of text features with market labels on calendar date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use headline_alpha_data::MarketRecord;
use thiserror::Error;
use tracing::{info, warn};

use crate::sentiment::{FeatureFrame, SentimentFeatureVector};

/// Errors from joining features with labels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// No date is present on both sides.
    #[error(
        "no overlapping dates between {feature_dates} feature dates and {market_dates} market dates"
    )]
    Empty {
        feature_dates: usize,
        market_dates: usize,
    },
}

/// One date with both text features and market data.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub date: NaiveDate,
    pub features: Vec<f64>,
    pub market: MarketRecord,
}

/// Date-ascending rows present in both sources.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedFeatureTable {
    pub feature_names: Vec<String>,
    pub rows: Vec<JoinedRow>,
}

impl JoinedFeatureTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last dates in the table.
    #[must_use]
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.rows.first()?.date, self.rows.last()?.date))
    }
}

/// Joins feature vectors with market records on date.
///
/// Dates on only one side are dropped. A date repeated on either side keeps
/// its first occurrence. Output rows are sorted by date.
///
/// # Errors
///
/// Returns [`JoinError::Empty`] if no date appears on both sides.
pub fn join(
    features: &FeatureFrame,
    market: &[MarketRecord],
) -> Result<JoinedFeatureTable, JoinError> {
    let feature_index = first_by_date(features.vectors.iter(), |v: &SentimentFeatureVector| v.date);
    let market_index = first_by_date(market.iter(), MarketRecord::date);

    let feature_dupes = features.vectors.len() - feature_index.len();
    let market_dupes = market.len() - market_index.len();
    if feature_dupes > 0 || market_dupes > 0 {
        warn!(
            feature_dupes,
            market_dupes, "Repeated dates in join input, keeping first occurrence"
        );
    }

    let rows: Vec<JoinedRow> = feature_index
        .iter()
        .filter_map(|(date, vector)| {
            market_index.get(date).map(|record| JoinedRow {
                date: *date,
                features: vector.values.clone(),
                market: (*record).clone(),
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(JoinError::Empty {
            feature_dates: feature_index.len(),
            market_dates: market_index.len(),
        });
    }

    info!(
        feature_dates = feature_index.len(),
        market_dates = market_index.len(),
        joined = rows.len(),
        "Joined features with market labels"
    );

    Ok(JoinedFeatureTable {
        feature_names: features.feature_names.clone(),
        rows,
    })
}

fn first_by_date<'a, T, I, F>(items: I, date_of: F) -> BTreeMap<NaiveDate, &'a T>
where
    I: Iterator<Item = &'a T>,
    F: Fn(&T) -> NaiveDate,
{
    let mut index = BTreeMap::new();
    for item in items {
        index.entry(date_of(item)).or_insert(item);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use headline_alpha_data::MarketBar;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 9, d).unwrap()
    }

    fn frame(days: &[u32]) -> FeatureFrame {
        FeatureFrame {
            feature_names: vec!["main_title_compound".to_string()],
            vectors: days
                .iter()
                .map(|d| SentimentFeatureVector {
                    date: day(*d),
                    values: vec![f64::from(*d) / 100.0],
                })
                .collect(),
            format_errors: 0,
        }
    }

    fn market(days: &[u32]) -> Vec<MarketRecord> {
        days.iter()
            .map(|d| MarketRecord::terminal(MarketBar::from_close(day(*d), dec!(100), 1)))
            .collect()
    }

    #[test]
    fn keeps_only_shared_dates_in_order() {
        let table = join(&frame(&[4, 1, 2, 7]), &market(&[1, 2, 3, 4, 5])).unwrap();

        let dates: Vec<NaiveDate> = table.rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(4)]);
        assert_eq!(table.rows[2].features, vec![0.04]);
        assert_eq!(table.date_span(), Some((day(1), day(4))));
    }

    #[test]
    fn row_count_equals_intersection_and_is_bounded() {
        let cases: [(&[u32], &[u32]); 4] = [
            (&[1, 2, 3], &[2, 3, 4]),
            (&[1, 2, 3, 4, 5, 6], &[6]),
            (&[10], &[1, 2, 3, 10, 11]),
            (&[1, 3, 5, 7], &[2, 3, 4, 5, 6, 7]),
        ];

        for (f, m) in cases {
            let table = join(&frame(f), &market(m)).unwrap();
            let intersection = f.iter().filter(|d| m.contains(d)).count();
            assert_eq!(table.len(), intersection);
            assert!(table.len() <= f.len().min(m.len()));
        }
    }

    #[test]
    fn duplicate_feature_dates_keep_first() {
        let mut features = frame(&[1, 2]);
        features.vectors.push(SentimentFeatureVector {
            date: day(1),
            values: vec![9.9],
        });

        let table = join(&features, &market(&[1, 2])).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].features, vec![0.01]);
    }

    #[test]
    fn disjoint_inputs_fail_with_empty_join() {
        let err = join(&frame(&[1, 2]), &market(&[3, 4, 5])).unwrap_err();
        assert_eq!(
            err,
            JoinError::Empty {
                feature_dates: 2,
                market_dates: 3
            }
        );
    }

    #[test]
    fn empty_features_fail_with_empty_join() {
        assert!(join(&frame(&[]), &market(&[1])).is_err());
    }
}
