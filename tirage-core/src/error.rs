use thiserror::Error;

pub type Result<T> = std::result::Result<T, TirageError>;

#[derive(Error, Debug)]
pub enum TirageError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Draw not found: {id}")]
    DrawNotFound { id: String },

    #[error("Corrupted record: {0}")]
    Corrupted(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TirageError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }

    pub fn draw_not_found(id: impl ToString) -> Self {
        Self::DrawNotFound { id: id.to_string() }
    }
}
