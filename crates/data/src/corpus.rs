//! Corpus assembly from monthly extracts.
//!
//! The scraping stage writes one extract per calendar month. Months it never
//! reached simply have no file; those gaps are logged and assembly carries
//! on with whatever exists.

use headline_alpha_core::dates::YearMonth;
use tracing::{debug, info, warn};

use crate::error::DataError;
use crate::models::TextRecord;

/// Storage collaborator that serves one month of extracted records.
pub trait MonthlyExtractSource {
    /// Loads the extract for `month`.
    ///
    /// Returns `Ok(None)` when no extract exists for that month.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing extract cannot be read or parsed.
    fn load_month(&self, month: YearMonth) -> Result<Option<Vec<TextRecord>>, DataError>;
}

/// Concatenated records from a range of months.
///
/// Records keep the order they were loaded in; use
/// [`Corpus::sorted_by_date`] before relying on chronology. Duplicate
/// collection dates are possible and handled downstream.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub records: Vec<TextRecord>,
    /// Months whose extract was found.
    pub months_loaded: Vec<YearMonth>,
    /// Months with no extract.
    pub gaps: Vec<YearMonth>,
}

impl Corpus {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the corpus, returning records sorted by collection date.
    ///
    /// Records whose date does not normalize sort last, in input order.
    #[must_use]
    pub fn sorted_by_date(self) -> Vec<TextRecord> {
        let mut records = self.records;
        records.sort_by_key(|r| match r.collection_day() {
            Ok(date) => (0, Some(date)),
            Err(_) => (1, None),
        });
        records
    }
}

/// Builds a [`Corpus`] by pulling each month from an injected source.
pub struct CorpusAssembler<S> {
    source: S,
}

impl<S: MonthlyExtractSource> CorpusAssembler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Assembles every month from `start` to `end` inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is invalid or an existing extract
    /// fails to load. Missing months are not errors.
    pub fn assemble(&self, start: YearMonth, end: YearMonth) -> Result<Corpus, DataError> {
        let months = YearMonth::range_inclusive(start, end)?;
        let mut corpus = Corpus::default();

        for month in months {
            match self.source.load_month(month)? {
                Some(records) => {
                    debug!(%month, count = records.len(), "Loaded monthly extract");
                    corpus.records.extend(records);
                    corpus.months_loaded.push(month);
                }
                None => {
                    warn!(%month, "No extract for month, skipping gap");
                    corpus.gaps.push(month);
                }
            }
        }

        info!(
            %start,
            %end,
            records = corpus.records.len(),
            months_loaded = corpus.months_loaded.len(),
            gaps = corpus.gaps.len(),
            "Assembled corpus"
        );
        Ok(corpus)
    }
}
