//! Date-based train/test partitioning.

use chrono::NaiveDate;
use headline_alpha_signals::JoinedFeatureTable;
use tracing::info;

/// Train rows strictly before the cutoff, test rows on or after it.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalSplit {
    pub cutoff: NaiveDate,
    pub train: JoinedFeatureTable,
    pub test: JoinedFeatureTable,
}

/// Splits `table` at `cutoff` without shuffling.
///
/// Every row lands in exactly one partition and date order is preserved.
#[must_use]
pub fn temporal_split(table: &JoinedFeatureTable, cutoff: NaiveDate) -> TemporalSplit {
    let (train, test): (Vec<_>, Vec<_>) = table
        .rows
        .iter()
        .cloned()
        .partition(|row| row.date < cutoff);

    info!(
        %cutoff,
        train = train.len(),
        test = test.len(),
        "Split joined table"
    );

    TemporalSplit {
        cutoff,
        train: JoinedFeatureTable {
            feature_names: table.feature_names.clone(),
            rows: train,
        },
        test: JoinedFeatureTable {
            feature_names: table.feature_names.clone(),
            rows: test,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headline_alpha_data::{MarketBar, MarketRecord};
    use headline_alpha_signals::JoinedRow;
    use rust_decimal_macros::dec;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, m, d).unwrap()
    }

    fn table(dates: &[NaiveDate]) -> JoinedFeatureTable {
        JoinedFeatureTable {
            feature_names: vec!["x".to_string()],
            rows: dates
                .iter()
                .map(|d| JoinedRow {
                    date: *d,
                    features: vec![0.0],
                    market: MarketRecord::terminal(MarketBar::from_close(*d, dec!(1), 1)),
                })
                .collect(),
        }
    }

    #[test]
    fn partitions_are_disjoint_and_exhaustive() {
        let dates: Vec<NaiveDate> = (1..=28).map(|d| date(2, d)).collect();
        let input = table(&dates);

        for cutoff_day in [1, 10, 15, 28] {
            let cutoff = date(2, cutoff_day);
            let split = temporal_split(&input, cutoff);

            assert_eq!(split.train.len() + split.test.len(), input.len());
            assert!(split.train.rows.iter().all(|r| r.date < cutoff));
            assert!(split.test.rows.iter().all(|r| r.date >= cutoff));
        }
    }

    #[test]
    fn cutoff_day_belongs_to_test() {
        let split = temporal_split(&table(&[date(2, 14), date(2, 15), date(2, 16)]), date(2, 15));

        assert_eq!(split.train.len(), 1);
        assert_eq!(split.test.rows[0].date, date(2, 15));
    }

    #[test]
    fn cutoff_outside_range_empties_one_side() {
        let input = table(&[date(1, 10), date(3, 10)]);

        assert!(temporal_split(&input, date(1, 1)).train.is_empty());
        assert!(temporal_split(&input, date(12, 31)).test.is_empty());
    }
}
