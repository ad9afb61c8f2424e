//! VADER compound scorer.

use vader_sentiment::SentimentIntensityAnalyzer;

use super::{non_blank, SentimentScore, SentimentScorer};

/// Single-dimension scorer backed by VADER's normalized compound valence.
pub struct CompoundScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl CompoundScorer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Compound valence of `text` in [-1, 1].
    #[must_use]
    pub fn analyze(&self, text: &str) -> f64 {
        let scores = self.analyzer.polarity_scores(text);
        scores
            .get("compound")
            .copied()
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }
}

impl Default for CompoundScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for CompoundScorer {
    fn dimensions(&self) -> &'static [&'static str] {
        &["compound"]
    }

    fn score(&self, text: Option<&str>) -> SentimentScore {
        SentimentScore::Compound(non_blank(text).map_or(0.0, |t| self.analyze(t)))
    }
}
