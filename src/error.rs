//! Error types for the fleet service.

/// Errors surfaced by the store, repository, and request parsing.
#[derive(Debug, Clone)]
pub enum Error {
    /// Malformed or out-of-range input in a write payload. Rejected before
    /// any store interaction.
    InvalidInput(String),
    /// Underlying persistence failure (I/O, corrupt data file).
    Storage(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            Error::Storage(msg) => write!(f, "storage error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

/// Result type for fleet operations.
pub type Result<T> = std::result::Result<T, Error>;
