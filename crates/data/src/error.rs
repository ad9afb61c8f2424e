use std::path::PathBuf;

use headline_alpha_core::dates::MonthError;
use thiserror::Error;

/// Errors reading extracts or market data.
///
/// A missing monthly extract is not an error; see
/// [`crate::corpus::MonthlyExtractSource`].
#[derive(Error, Debug)]
pub enum DataError {
    /// IO error reading a file that exists.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content.
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header.
    #[error("{path} is missing required column {column:?}")]
    MissingColumn { path: PathBuf, column: &'static str },

    /// The requested month range is invalid.
    #[error(transparent)]
    Month(#[from] MonthError),
}

impl DataError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
