use thiserror::Error;

pub type RelayResult<T> = Result<T, RelayError>;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Blob absent, or present but unreadable by every configured reader.
    /// The two causes are deliberately not distinguished.
    #[error("not found: {0}")]
    NotFound(String),

    /// Stored blobs are write-once; a name already in use is never overwritten.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("format error: {0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RelayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RelayError::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, RelayError::AlreadyExists(_))
    }
}
