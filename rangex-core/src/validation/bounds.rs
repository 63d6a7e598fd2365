//! Column bounds and alignment validation
//!
//! Pure checks performed before reinterpreting file bytes as typed
//! columns. No I/O.

use crate::error::RangexError;

/// Validate that `byte_len` bytes hold a whole number of `T`
///
/// Returns the element count.
pub const fn validate_array_bounds<T>(byte_len: usize) -> Result<usize, RangexError> {
    let element_size = core::mem::size_of::<T>();

    if byte_len % element_size != 0 {
        return Err(RangexError::ArrayAlignment);
    }

    let count = byte_len / element_size;

    // Slices may not exceed isize::MAX bytes
    if byte_len > isize::MAX as usize {
        return Err(RangexError::ArraySizeOverflow);
    }

    Ok(count)
}

/// Validate alignment for a pointer to typed data
pub fn validate_alignment<T>(ptr: *const u8) -> Result<(), RangexError> {
    let alignment = core::mem::align_of::<T>();
    let addr = ptr as usize;

    if addr % alignment != 0 {
        return Err(RangexError::ArrayAlignment);
    }

    Ok(())
}

/// Validate that a byte slice can be safely interpreted as a typed array
///
/// Combines length and alignment validation. Returns the element count.
pub fn validate_typed_slice<T>(data: &[u8]) -> Result<usize, RangexError> {
    validate_alignment::<T>(data.as_ptr())?;
    validate_array_bounds::<T>(data.len())
}
