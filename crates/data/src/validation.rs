//! Record integrity checks.
//!
//! A snapshot is only trusted when the archive returned a capture taken on
//! the day the record claims to represent. The archive serves the *closest*
//! capture, which for a quiet day can be the next day's page.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::TextRecord;

/// Maximum number of offending records listed in a [`ValidationReport`].
const MAX_REPORTED_DROPS: usize = 10;

/// Returns true if the snapshot timestamp falls on the collection date.
///
/// Compares the first eight characters of the timestamp with the
/// collection date as strings. A collection date in any other layout than
/// `YYYYMMDD` therefore never matches. A missing, short, or non-numeric
/// timestamp is invalid. Never panics.
#[must_use]
pub fn is_valid(record: &TextRecord) -> bool {
    record
        .timestamp_date_prefix()
        .is_some_and(|prefix| prefix == record.collection_date.trim())
}

/// Returns true if every record passes [`is_valid`].
#[must_use]
pub fn validate_all(records: &[TextRecord]) -> bool {
    records.iter().all(is_valid)
}

/// Valid records plus a count of what was excluded.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    pub valid: Vec<TextRecord>,
    pub dropped: usize,
}

/// Splits out invalid records, logging each exclusion.
///
/// Never fails; fully invalid input produces an empty `valid` set.
pub fn filter_valid(records: Vec<TextRecord>) -> ValidationOutcome {
    let total = records.len();
    let mut outcome = ValidationOutcome::default();

    for record in records {
        if is_valid(&record) {
            outcome.valid.push(record);
        } else {
            warn!(
                collection_date = %record.collection_date,
                snapshot_timestamp = %record.snapshot_timestamp,
                "Dropping record: snapshot timestamp does not match collection date"
            );
            outcome.dropped += 1;
        }
    }

    info!(
        total,
        valid = outcome.valid.len(),
        dropped = outcome.dropped,
        "Validated text records"
    );
    outcome
}

/// A dropped record, as listed in a [`ValidationReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedRecord {
    pub collection_date: String,
    pub snapshot_timestamp: String,
}

/// Corpus-level validation summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total: usize,
    pub valid: usize,
    pub dropped: usize,
    /// First and last valid collection dates.
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Up to ten of the dropped records, in input order.
    pub sample_drops: Vec<DroppedRecord>,
}

impl ValidationReport {
    /// Builds a report without consuming the records.
    #[must_use]
    pub fn from_records(records: &[TextRecord]) -> Self {
        let mut valid_dates = Vec::new();
        let mut sample_drops = Vec::new();
        let mut dropped = 0;

        for record in records {
            if is_valid(record) {
                if let Ok(date) = record.collection_day() {
                    valid_dates.push(date);
                }
            } else {
                dropped += 1;
                if sample_drops.len() < MAX_REPORTED_DROPS {
                    sample_drops.push(DroppedRecord {
                        collection_date: record.collection_date.clone(),
                        snapshot_timestamp: record.snapshot_timestamp.clone(),
                    });
                }
            }
        }

        Self {
            total: records.len(),
            valid: records.len() - dropped,
            dropped,
            first_date: valid_dates.iter().min().copied(),
            last_date: valid_dates.iter().max().copied(),
            sample_drops,
        }
    }
}
