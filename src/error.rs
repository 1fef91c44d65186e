use std::path::PathBuf;

use rand::distributions::WeightedError;
use thiserror::Error;

/// Errors that can abort a training run.
///
/// Nothing in the crate recovers from these locally; they propagate up to the
/// caller of [`Trainer::train`](crate::rl::training::Trainer::train).
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("failed to read config file {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to prepare checkpoint directory {}: {source}", path.display())]
    CheckpointIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tensor operation failed: {0}")]
    Tensor(#[from] tch::TchError),

    #[error("environment failure: {0}")]
    Environment(String),

    #[error("shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("action {action} is out of range for {n_actions} actions")]
    InvalidAction { action: usize, n_actions: usize },

    #[error("action mask forbids every action")]
    EmptyMask,

    #[error("cannot sample from action distribution: {0}")]
    Sampling(#[from] WeightedError),

    #[error("trajectory {0}")]
    Trajectory(&'static str),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TrainError>;
