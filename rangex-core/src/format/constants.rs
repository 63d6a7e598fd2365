//! Format constants for range files

/// Alignment boundary for every column in a range file
pub const ALIGNMENT_BOUNDARY: usize = 8;

/// Conventional file extension for columnar range files
pub const FILE_EXTENSION: &str = "rngx";

/// Header flags
pub mod flags {
    /// Columns are stored in ascending start order
    pub const SORTED_BY_START: u8 = 1 << 0;
    /// A `u64` value column follows the end column
    pub const HAS_VALUES: u8 = 1 << 1;
}
