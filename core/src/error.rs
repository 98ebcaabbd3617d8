use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Assignment '{id}' not found")]
    AssignmentNotFound { id: String },

    #[error("Shift '{id}' not found")]
    ShiftNotFound { id: String },

    #[error("Malformed date '{value}' in roster data")]
    MalformedDate { value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
