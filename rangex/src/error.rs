//! Error types for range file I/O, generation and benchmarking

use rangex_core::{DataType, RangexError};

/// Errors raised by the `rangex` collaborators
///
/// The index itself never fails; everything here comes from reading,
/// writing, parsing or configuring around it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying file system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Range file failed structural validation
    #[error("range file error: {0}")]
    Format(RangexError),

    /// A text record could not be parsed
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file holds a different bound type than requested
    #[error("data type mismatch: expected {expected}, file holds {found}")]
    DataTypeMismatch { expected: DataType, found: DataType },

    /// Input format could not be determined from the path
    #[error("unsupported input {0}")]
    UnsupportedInput(String),

    /// Inconsistent generator or benchmark settings
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<RangexError> for Error {
    fn from(error: RangexError) -> Self {
        Error::Format(error)
    }
}

/// Result type for `rangex` operations
pub type Result<T> = std::result::Result<T, Error>;
