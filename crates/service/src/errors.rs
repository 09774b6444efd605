use thiserror::Error;
use tracing::error;

use models::errors::ModelError;

/// The four outcomes a caller has to distinguish. The HTTP layer maps each
/// to a status code; `Internal` never carries the raw datastore error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Conflict(_) => 409,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Translate a datastore-level failure. Duplicate keys become `Conflict`;
    /// unexpected failures are logged here and surface as a generic `Internal`.
    pub fn from_model(err: ModelError, action: &str) -> Self {
        match err {
            ModelError::Duplicate { key, value } => {
                ServiceError::Conflict(format!("Pokemon exists in db {{\"{key}\":{value}}}"))
            }
            ModelError::Validation(msg) => ServiceError::BadRequest(msg),
            ModelError::NotFound(msg) => ServiceError::NotFound(msg),
            ModelError::Db(raw) => {
                error!(error = %raw, action, "datastore failure");
                ServiceError::Internal(format!("Can't {action} pokemon - Check server logs"))
            }
        }
    }
}
