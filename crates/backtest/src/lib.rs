pub mod cross_validation;
pub mod dataset;
pub mod error;
pub mod forest;
pub mod importance;
pub mod metrics;
pub mod split;
pub mod trainer;

pub use cross_validation::{grid_search, kfold, CandidateScore, Fold, GridSearch};
pub use dataset::Dataset;
pub use error::{Partition, TrainError};
pub use forest::{DecisionTree, ForestParams, RandomForest, TreeParams};
pub use importance::{report, ImportanceRow, ImportanceTable};
pub use metrics::{accuracy, constant_accuracy};
pub use split::{temporal_split, TemporalSplit};
pub use trainer::{Trainer, TrainedModel, TrainingSummary};
