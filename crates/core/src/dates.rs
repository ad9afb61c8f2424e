//! Calendar date normalization and month ranges.
//!
//! Extract files carry compact `YYYYMMDD` dates while market data uses
//! hyphenated ISO dates. Both are normalized to [`NaiveDate`] so the joiner
//! can match on a single canonical key.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A date string that matches neither `YYYYMMDD` nor `YYYY-MM-DD`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized date format: {raw:?} (expected YYYYMMDD or YYYY-MM-DD)")]
pub struct FormatError {
    /// The offending input.
    pub raw: String,
}

impl FormatError {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
        }
    }
}

/// Normalizes a compact (`20200901`) or hyphenated (`2020-09-01`) date.
///
/// Surrounding whitespace is ignored. Impossible calendar dates are rejected.
///
/// # Errors
///
/// Returns [`FormatError`] if the input matches neither format.
pub fn normalize(raw: &str) -> Result<NaiveDate, FormatError> {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();

    let format = match bytes.len() {
        8 if bytes.iter().all(u8::is_ascii_digit) => "%Y%m%d",
        10 if is_hyphenated(bytes) => "%Y-%m-%d",
        _ => return Err(FormatError::new(raw)),
    };

    NaiveDate::parse_from_str(trimmed, format).map_err(|_| FormatError::new(raw))
}

fn is_hyphenated(bytes: &[u8]) -> bool {
    bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    })
}

/// Renders a date in the compact `YYYYMMDD` form used by extract files.
#[must_use]
pub fn to_compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Errors building a [`YearMonth`] or a month range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MonthError {
    #[error("month {0} is out of range 1..=12")]
    InvalidMonth(u32),

    #[error("month range is reversed: {start} comes after {end}")]
    ReversedRange { start: YearMonth, end: YearMonth },
}

/// A calendar month, the bucket granularity of extract files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Creates a month, validating `month` is in `1..=12`.
    ///
    /// # Errors
    ///
    /// Returns [`MonthError::InvalidMonth`] for an out-of-range month.
    pub fn new(year: i32, month: u32) -> Result<Self, MonthError> {
        if !(1..=12).contains(&month) {
            return Err(MonthError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// The following month, rolling over December.
    #[must_use]
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Every month from `start` to `end`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if either month is invalid or `start > end`.
    pub fn range_inclusive(start: Self, end: Self) -> Result<Vec<Self>, MonthError> {
        for ym in [start, end] {
            if !(1..=12).contains(&ym.month) {
                return Err(MonthError::InvalidMonth(ym.month));
            }
        }
        if start > end {
            return Err(MonthError::ReversedRange { start, end });
        }

        let mut months = Vec::new();
        let mut current = start;
        while current <= end {
            months.push(current);
            current = current.succ();
        }
        Ok(months)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}
