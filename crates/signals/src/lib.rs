pub mod join;
pub mod market_features;
pub mod sentiment;

// Re-export sentiment scoring for convenience
pub use sentiment::{
    scorer_for, CompoundScorer, FeatureExtractor, FeatureFrame, LexiconScorer,
    SentimentFeatureVector, SentimentScore, SentimentScorer,
};

// Re-export market labels
pub use market_features::{MarketFeatureBuilder, DEFAULT_VOLUME_LARGE_THRESHOLD};

// Re-export feature/label alignment
pub use join::{join, JoinError, JoinedFeatureTable, JoinedRow};
