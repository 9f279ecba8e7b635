//! Error types for systband

use thiserror::Error;

/// systband error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An expected input file or stored object is absent
    #[error("missing resource: {0}")]
    MissingResource(String),

    /// No stored histogram matched the expected naming pattern
    #[error("no matching data: {0}")]
    NoMatchingData(String),

    /// Configuration document missing, malformed or inconsistent
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Histogram store error (wrapped as text to keep this crate store-agnostic)
    #[error("store error: {0}")]
    Store(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Whether this error only affects one sample/variation and processing may continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::MissingResource(_) | Error::NoMatchingData(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_classification() {
        assert!(Error::MissingResource("x".into()).is_recoverable());
        assert!(Error::NoMatchingData("x".into()).is_recoverable());
        assert!(!Error::Configuration("x".into()).is_recoverable());
        assert!(!Error::Validation("x".into()).is_recoverable());
    }

    #[test]
    fn display_messages() {
        let e = Error::MissingResource("inputs/a.json".into());
        assert_eq!(e.to_string(), "missing resource: inputs/a.json");
    }
}
