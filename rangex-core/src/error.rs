//! Error types for range file and query-string handling
//!
//! Building and querying an index never fails; these errors only arise when
//! decoding the binary file format or parsing query arguments.

/// Errors that can occur while decoding range data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangexError {
    /// Invalid header format
    InvalidHeader,
    /// Unsupported format version or data type
    UnsupportedFormat,
    /// Column layout inconsistent with the header
    CorruptedData,
    /// Insufficient buffer space
    InsufficientBuffer,
    /// Column not aligned for its element type
    ArrayAlignment,
    /// Column too large to address
    ArraySizeOverflow,
    /// Column extends beyond the end of the data
    IndexOutOfBounds,
    /// Query string could not be parsed
    InvalidQuery,
}

impl core::fmt::Display for RangexError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            RangexError::InvalidHeader => "Invalid range file header",
            RangexError::UnsupportedFormat => "Unsupported format version or data type",
            RangexError::CorruptedData => "Data corruption detected",
            RangexError::InsufficientBuffer => "Insufficient buffer space",
            RangexError::ArrayAlignment => "Column not aligned for element type",
            RangexError::ArraySizeOverflow => "Column size overflows",
            RangexError::IndexOutOfBounds => "Column extends beyond data",
            RangexError::InvalidQuery => "Invalid query string",
        };
        write!(f, "{msg}")
    }
}

/// Result type for range file operations
pub type Result<T> = core::result::Result<T, RangexError>;
