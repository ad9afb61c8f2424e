//! Sentiment scoring of headline text.
//!
//! A [`SentimentScorer`] turns one text field into a fixed number of
//! numeric dimensions. Absent text always scores as neutral (all zeros) so
//! a homepage with fewer populated slots still yields a full feature row.

pub mod compound;
pub mod extractor;
pub mod lexicon;

use headline_alpha_core::ScorerKind;
use serde::{Deserialize, Serialize};

pub use compound::CompoundScorer;
pub use extractor::{FeatureExtractor, FeatureFrame, SentimentFeatureVector};
pub use lexicon::LexiconScorer;

/// Score of a single piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SentimentScore {
    /// Polarity in [-1, 1] and subjectivity in [0, 1].
    PolaritySubjectivity { polarity: f64, subjectivity: f64 },
    /// Single compound valence in [-1, 1].
    Compound(f64),
}

impl SentimentScore {
    /// Score values in the scorer's dimension order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        match *self {
            Self::PolaritySubjectivity {
                polarity,
                subjectivity,
            } => vec![polarity, subjectivity],
            Self::Compound(compound) => vec![compound],
        }
    }
}

/// Maps text to a sentiment score.
///
/// Implementations must be deterministic: the same input always produces
/// the same score.
pub trait SentimentScorer: Send + Sync {
    /// Names of the score dimensions, used as feature name suffixes.
    fn dimensions(&self) -> &'static [&'static str];

    /// Scores `text`, returning the neutral score for absent or blank text.
    fn score(&self, text: Option<&str>) -> SentimentScore;
}

/// Builds the scorer selected by configuration.
#[must_use]
pub fn scorer_for(kind: ScorerKind) -> Box<dyn SentimentScorer> {
    match kind {
        ScorerKind::PolaritySubjectivity => Box::new(LexiconScorer::new()),
        ScorerKind::Compound => Box::new(CompoundScorer::new()),
    }
}

/// Returns the text if it has any non-whitespace content.
pub(crate) fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
