use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{Reader, StringRecord};
use headline_alpha_core::dates::{normalize, YearMonth};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::corpus::MonthlyExtractSource;
use crate::error::DataError;
use crate::models::{MarketBar, TextField, TextRecord};

/// Reads monthly extracts named `{prefix}{YYYYMM}.csv` from a directory.
///
/// Columns are matched by header name: `date`, `timestamp`, and any of the
/// text field columns. Other columns (such as a leading unnamed index) are
/// ignored, and absent text columns leave those fields empty.
#[derive(Debug, Clone)]
pub struct CsvExtractSource {
    dir: PathBuf,
    prefix: String,
}

impl CsvExtractSource {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Path of the extract for `month`.
    #[must_use]
    pub fn path_for(&self, month: YearMonth) -> PathBuf {
        self.dir.join(format!("{}{}.csv", self.prefix, month))
    }
}

impl MonthlyExtractSource for CsvExtractSource {
    fn load_month(&self, month: YearMonth) -> Result<Option<Vec<TextRecord>>, DataError> {
        let path = self.path_for(month);
        if !path.is_file() {
            return Ok(None);
        }
        CsvStorage::read_text_records(&path).map(Some)
    }
}

pub struct CsvStorage;

impl CsvStorage {
    /// Reads one extract file into text records.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is malformed CSV, or
    /// lacks a `date` or `timestamp` column.
    pub fn read_text_records(path: &Path) -> Result<Vec<TextRecord>, DataError> {
        let mut reader = open_reader(path)?;
        let header = HeaderIndex::new(reader.headers().map_err(|e| DataError::csv(path, e))?);

        let date_col = header.require(path, "date")?;
        let timestamp_col = header.require(path, "timestamp")?;
        let text_cols: Vec<(TextField, usize)> = TextField::ALL
            .iter()
            .filter_map(|field| header.get(field.column()).map(|col| (*field, col)))
            .collect();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| DataError::csv(path, e))?;
            let mut record = TextRecord::new(
                row.get(date_col).unwrap_or_default().trim(),
                row.get(timestamp_col).unwrap_or_default().trim(),
            );
            for (field, col) in &text_cols {
                let text = row.get(*col).map(|t| t.trim().to_string());
                record.fields.set(*field, text);
            }
            records.push(record);
        }

        debug!(
            path = %path.display(),
            count = records.len(),
            text_columns = text_cols.len(),
            "Read text extract"
        );
        Ok(records)
    }

    /// Reads a daily market series, sorted by date.
    ///
    /// Expects `Date,Open,High,Low,Close,Adj Close,Volume` (header matching is
    /// case-insensitive and treats spaces as underscores). `Adj Close` falls
    /// back to `Close` when absent. Rows with an unparseable date or price,
    /// such as the `null` rows some providers emit for holidays, are skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is malformed CSV, or
    /// lacks a required column.
    pub fn read_market_bars(path: &Path) -> Result<Vec<MarketBar>, DataError> {
        let mut reader = open_reader(path)?;
        let header = HeaderIndex::new(reader.headers().map_err(|e| DataError::csv(path, e))?);

        let cols = MarketColumns {
            date: header.require(path, "date")?,
            open: header.require(path, "open")?,
            high: header.require(path, "high")?,
            low: header.require(path, "low")?,
            close: header.require(path, "close")?,
            adj_close: header.get("adj_close"),
            volume: header.require(path, "volume")?,
        };

        let mut bars = Vec::new();
        let mut skipped = 0usize;
        for (line, row) in reader.records().enumerate() {
            let row = row.map_err(|e| DataError::csv(path, e))?;
            match cols.parse(&row) {
                Some(bar) => bars.push(bar),
                None => {
                    skipped += 1;
                    warn!(
                        path = %path.display(),
                        line = line + 2,
                        row = ?row,
                        "Skipping unparseable market row"
                    );
                }
            }
        }

        bars.sort_by_key(|b| b.date);
        info!(
            path = %path.display(),
            count = bars.len(),
            skipped,
            "Read market series"
        );
        Ok(bars)
    }
}

fn open_reader(path: &Path) -> Result<Reader<File>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Reader::from_reader(file))
}

/// Header name to column index, keyed by lowercase snake-cased names.
struct HeaderIndex(HashMap<String, usize>);

impl HeaderIndex {
    fn new(headers: &StringRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_lowercase().replace(' ', "_"), i))
            .collect();
        Self(index)
    }

    fn get(&self, name: &str) -> Option<usize> {
        self.0.get(name).copied()
    }

    fn require(&self, path: &Path, column: &'static str) -> Result<usize, DataError> {
        self.get(column).ok_or_else(|| DataError::MissingColumn {
            path: path.to_path_buf(),
            column,
        })
    }
}

struct MarketColumns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    adj_close: Option<usize>,
    volume: usize,
}

impl MarketColumns {
    fn parse(&self, row: &StringRecord) -> Option<MarketBar> {
        let price = |col: usize| Decimal::from_str(row.get(col)?.trim()).ok();

        let date = normalize(row.get(self.date)?).ok()?;
        let close = price(self.close)?;
        let adj_close = match self.adj_close {
            Some(col) => price(col)?,
            None => close,
        };

        Some(MarketBar {
            date,
            open: price(self.open)?,
            high: price(self.high)?,
            low: price(self.low)?,
            close,
            adj_close,
            volume: parse_volume(row.get(self.volume)?)?,
        })
    }
}

/// Volumes are integers, but some exports write them as `123.0`.
fn parse_volume(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    raw.parse::<u64>()
        .ok()
        .or_else(|| Decimal::from_str(raw).ok()?.trunc().to_u64())
}
