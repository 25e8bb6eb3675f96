use astra::Response;
// errors.rs
use crate::model::ModelError;
use std::fmt;

/// Errors surfaced at the HTTP boundary: routing and request shape,
/// model readiness, and the downstream layers (DB, model).
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    BadRequest(String),
    ModelNotReady(String),
    DbError(String),
    ModelError(String),
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::ModelNotReady(_) => 503,
            ServerError::DbError(_) | ServerError::ModelError(_) | ServerError::InternalError => {
                500
            }
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::ModelNotReady(msg) => write!(f, "Model Not Ready: {msg}"),
            ServerError::DbError(msg) => write!(f, "Database Error: {msg}"),
            ServerError::ModelError(msg) => write!(f, "Model Error: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<ModelError> for ServerError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NotFitted => ServerError::ModelNotReady(err.to_string()),
            other => ServerError::ModelError(other.to_string()),
        }
    }
}
