//! Core error types for Blipty
use thiserror::Error;

/// Result type alias using `BliptyError`
pub type Result<T> = std::result::Result<T, BliptyError>;

/// Core error type for Blipty
#[derive(Error, Debug)]
pub enum BliptyError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A backend command was rejected or failed
    #[error("Backend command `{command}` failed: {message}")]
    Backend { command: String, message: String },

    /// The backend does not implement this command
    #[error("Unsupported by this backend: {0}")]
    Unsupported(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl BliptyError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a backend command failure
    pub fn backend(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            command: command.into(),
            message: message.into(),
        }
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for BliptyError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
