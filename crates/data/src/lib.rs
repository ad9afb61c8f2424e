//! Data layer for the headline sentiment pipeline.
//!
//! This crate provides:
//! - Typed models for homepage snapshot text and daily market bars
//! - The monthly extract source seam and the corpus assembler
//! - CSV storage adapters for extracts and market series
//! - Record validation against snapshot timestamps

pub mod corpus;
pub mod csv_storage;
pub mod error;
pub mod models;
pub mod validation;

pub use corpus::{Corpus, CorpusAssembler, MonthlyExtractSource};
pub use csv_storage::{CsvExtractSource, CsvStorage};
pub use error::DataError;
pub use validation::{
    filter_valid, is_valid, validate_all, DroppedRecord, ValidationOutcome, ValidationReport,
};

// Re-export models
pub use models::{HeadlineFields, MarketBar, MarketRecord, TextField, TextRecord};
