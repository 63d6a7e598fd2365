//! Layout validation utilities for range files
//!
//! Pure functions for alignment and column-boundary constraints.

use crate::error::RangexError;

/// Align an offset to a power-of-two boundary
pub const fn align_to_boundary(offset: usize, boundary: usize) -> usize {
    (offset + boundary - 1) & !(boundary - 1)
}

/// Calculate padding needed to reach alignment boundary
pub const fn calculate_padding(offset: usize, boundary: usize) -> usize {
    let aligned = align_to_boundary(offset, boundary);
    aligned - offset
}

/// Validate that an offset is properly aligned
pub const fn validate_offset_alignment(offset: usize, boundary: usize) -> Result<(), RangexError> {
    if offset % boundary != 0 {
        return Err(RangexError::ArrayAlignment);
    }
    Ok(())
}

/// Validate that a column `[offset, offset + len)` lies inside `total_size` bytes
///
/// Columns must not start inside the header.
pub const fn validate_column(
    offset: usize,
    len: usize,
    header_size: usize,
    total_size: usize,
) -> Result<(), RangexError> {
    if offset < header_size {
        return Err(RangexError::CorruptedData);
    }

    let end = match offset.checked_add(len) {
        Some(end) => end,
        None => return Err(RangexError::ArraySizeOverflow),
    };

    if end > total_size {
        return Err(RangexError::IndexOutOfBounds);
    }

    Ok(())
}
