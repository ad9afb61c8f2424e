use std::fmt;

use thiserror::Error;

/// Side of the temporal split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Train,
    Test,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Train => write!(f, "train"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Errors from model training and evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainError {
    /// A split partition has no labeled rows.
    #[error("{partition} partition is empty after the temporal split")]
    TrainingDataExhaustion { partition: Partition },

    /// Too few labeled training rows to cross-validate.
    #[error("cross-validation needs at least 2 training rows, found {found}")]
    InsufficientSamples { found: usize },

    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),
}
