//! Validation and parsing utilities
//!
//! Pure functions on data layout and query strings. No I/O.

pub mod bounds;
pub mod format;
pub mod parsing;

pub use bounds::{validate_alignment, validate_array_bounds, validate_typed_slice};
pub use format::{
    align_to_boundary, calculate_padding, validate_column, validate_offset_alignment,
};
pub use parsing::{parse_interval, parse_point};
