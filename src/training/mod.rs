//! Offline training: load historical listings, clean labels, fit and store.

pub mod dataset;
pub mod job;

pub use dataset::Dataset;
pub use job::{TrainingJob, TrainingReport};

use crate::errors::ServerError;
use crate::model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("failed to read training data: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed training data: {0}")]
    Csv(#[from] csv::Error),

    #[error("target column `{0}` not found in training data")]
    MissingTarget(String),

    #[error("no target values to learn from")]
    NoTargets,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("model store: {0}")]
    Store(#[from] ServerError),
}

impl From<TrainingError> for ServerError {
    fn from(err: TrainingError) -> Self {
        match err {
            TrainingError::Store(inner) => inner,
            other => ServerError::ModelNotReady(format!("training failed: {other}")),
        }
    }
}
