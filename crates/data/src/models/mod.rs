//! Data models for the headline pipeline.

pub mod market;
pub mod text_record;

pub use market::{MarketBar, MarketRecord};
pub use text_record::{HeadlineFields, TextField, TextRecord};
