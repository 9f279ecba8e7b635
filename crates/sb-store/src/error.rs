//! Store error types.

use thiserror::Error;

/// Errors raised while reading or writing a store file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file does not exist.
    #[error("store file not found: {0}")]
    NotFound(String),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON or an object violating its invariants.
    #[error("decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown or missing schema version.
    #[error("unsupported store schema: {0}")]
    BadSchema(String),

    /// No directory at the given path.
    #[error("directory not found: {0}")]
    DirectoryNotFound(String),

    /// No object at the given path.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// An object exists at the path but has a different class.
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Object path.
        path: String,
        /// Requested class.
        expected: &'static str,
        /// Stored class.
        found: &'static str,
    },
}

impl StoreError {
    /// Whether the error means "the thing is absent" rather than "the thing is broken".
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound(_) | StoreError::DirectoryNotFound(_) | StoreError::KeyNotFound(_)
        )
    }
}

impl From<StoreError> for sb_core::Error {
    fn from(e: StoreError) -> Self {
        if e.is_missing() {
            sb_core::Error::MissingResource(e.to_string())
        } else {
            sb_core::Error::Store(e.to_string())
        }
    }
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
