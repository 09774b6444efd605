use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    /// A unique index rejected the write; `key` names the column.
    #[error("duplicate key {{\"{key}\":{value}}}")]
    Duplicate { key: String, value: serde_json::Value },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ModelError {
    pub fn duplicate(key: &str, value: impl Into<serde_json::Value>) -> Self {
        Self::Duplicate { key: key.to_string(), value: value.into() }
    }
}

impl From<sea_orm::DbErr> for ModelError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}
