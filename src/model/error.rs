use thiserror::Error;

/// Errors raised by the feature pipeline and the estimator.
///
/// Per-record data problems (missing values, unseen categories) are not
/// errors: they are absorbed by imputation and default encoding.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("schema mismatch: column `{column}` has no values in any training record")]
    SchemaMismatch { column: String },

    #[error("invalid column schema: {0}")]
    InvalidSchema(String),

    #[error("training set is empty")]
    EmptyDataset,

    #[error("got {records} records but {targets} targets")]
    LengthMismatch { records: usize, targets: usize },

    #[error("expected {expected} features per row, got {actual}")]
    FeatureWidth { expected: usize, actual: usize },

    #[error("model has not been fitted")]
    NotFitted,

    #[error("model artifact: {0}")]
    Artifact(String),
}
