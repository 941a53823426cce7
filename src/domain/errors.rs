use thiserror::Error;

/// Failure surfaced by a repository implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unexpected repository error: {0}")]
    Unexpected(String),
}

impl RepositoryError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

/// Failure surfaced by a binary object store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("stored object not found")]
    NotFound,
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error("storage I/O failed: {0}")]
    Io(String),
}
