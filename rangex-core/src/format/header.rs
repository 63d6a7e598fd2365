//! Range file header and element data types
//!
//! A range file is a fixed 64-byte header followed by three 8-byte aligned
//! columns: starts, ends and an optional `u64` value column. All integers in
//! the header are little-endian.

use core::mem::size_of;

use super::constants::{flags, ALIGNMENT_BOUNDARY};
use crate::error::{RangexError, Result};
use crate::validation::format::align_to_boundary;

/// Fixed-size header for range files
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeFileHeader {
    /// Magic bytes: "RNGX"
    pub magic: [u8; 4],
    /// Format version
    pub version: u8,
    /// Bound data type (see [`DataType`])
    pub data_type: u8,
    /// Layout flags (see [`flags`])
    pub flags: u8,
    /// Reserved, must be zero
    pub reserved_0: u8,
    /// Number of stored entries
    pub count: u64,
    /// Offset to the start column
    pub starts_offset: u64,
    /// Offset to the end column
    pub ends_offset: u64,
    /// Offset to the value column, 0 when absent
    pub values_offset: u64,
    /// Bit pattern of the largest span, zero-extended (informational)
    pub max_span_bits: u64,
    /// Reserved space for future extensions
    pub reserved: [u8; 16],
}

impl RangeFileHeader {
    /// Magic bytes for range files
    pub const MAGIC: [u8; 4] = *b"RNGX";

    /// Current format version
    pub const VERSION: u8 = 1;

    /// Size of the header in bytes
    pub const SIZE: usize = size_of::<Self>();

    /// Create an empty header for the given data type
    pub const fn new(data_type: DataType) -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            data_type: data_type as u8,
            flags: 0,
            reserved_0: 0,
            count: 0,
            starts_offset: 0,
            ends_offset: 0,
            values_offset: 0,
            max_span_bits: 0,
            reserved: [0; 16],
        }
    }

    /// Lay out the columns for `count` entries directly after the header
    pub fn with_layout(data_type: DataType, count: u64, has_values: bool) -> Result<Self> {
        let column_bytes = |width: usize| -> Result<usize> {
            let count = usize::try_from(count).map_err(|_| RangexError::ArraySizeOverflow)?;
            count
                .checked_mul(width)
                .ok_or(RangexError::ArraySizeOverflow)
        };

        let bound_bytes = column_bytes(data_type.size_bytes())?;
        let starts_offset = align_to_boundary(Self::SIZE, ALIGNMENT_BOUNDARY);
        let ends_offset = starts_offset
            .checked_add(bound_bytes)
            .map(|end| align_to_boundary(end, ALIGNMENT_BOUNDARY))
            .ok_or(RangexError::ArraySizeOverflow)?;

        let mut header = Self::new(data_type);
        header.count = count;
        header.starts_offset = starts_offset as u64;
        header.ends_offset = ends_offset as u64;

        if has_values {
            let values_offset = ends_offset
                .checked_add(bound_bytes)
                .map(|end| align_to_boundary(end, ALIGNMENT_BOUNDARY))
                .ok_or(RangexError::ArraySizeOverflow)?;
            // Reject layouts whose value column would not fit either
            values_offset
                .checked_add(column_bytes(size_of::<u64>())?)
                .ok_or(RangexError::ArraySizeOverflow)?;
            header.values_offset = values_offset as u64;
            header.flags |= flags::HAS_VALUES;
        }

        Ok(header)
    }

    /// Validate the header magic and version
    pub fn is_valid(&self) -> bool {
        self.magic == Self::MAGIC && self.version <= Self::VERSION && self.version > 0
    }

    /// Decoded bound data type
    pub fn data_type(&self) -> Result<DataType> {
        DataType::from_u8(self.data_type).ok_or(RangexError::UnsupportedFormat)
    }

    /// Whether columns are stored in ascending start order
    pub fn is_sorted(&self) -> bool {
        self.flags & flags::SORTED_BY_START != 0
    }

    /// Whether a value column is present
    pub fn has_values(&self) -> bool {
        self.flags & flags::HAS_VALUES != 0 && self.values_offset != 0
    }

    /// Byte range `(offset, len)` of the start column
    pub fn starts_region(&self) -> Result<(usize, usize)> {
        self.bound_region(self.starts_offset)
    }

    /// Byte range `(offset, len)` of the end column
    pub fn ends_region(&self) -> Result<(usize, usize)> {
        self.bound_region(self.ends_offset)
    }

    /// Byte range `(offset, len)` of the value column, if present
    pub fn values_region(&self) -> Result<Option<(usize, usize)>> {
        if !self.has_values() {
            return Ok(None);
        }
        let offset = to_usize(self.values_offset)?;
        let len = to_usize(self.count)?
            .checked_mul(size_of::<u64>())
            .ok_or(RangexError::ArraySizeOverflow)?;
        Ok(Some((offset, len)))
    }

    fn bound_region(&self, offset: u64) -> Result<(usize, usize)> {
        let width = self.data_type()?.size_bytes();
        let len = to_usize(self.count)?
            .checked_mul(width)
            .ok_or(RangexError::ArraySizeOverflow)?;
        Ok((to_usize(offset)?, len))
    }

    /// Parse header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(RangexError::InsufficientBuffer);
        }

        if bytes[0..4] != Self::MAGIC {
            return Err(RangexError::InvalidHeader);
        }

        let mut reserved = [0u8; 16];
        reserved.copy_from_slice(&bytes[48..64]);

        let header = Self {
            magic: Self::MAGIC,
            version: bytes[4],
            data_type: bytes[5],
            flags: bytes[6],
            reserved_0: bytes[7],
            count: read_u64(bytes, 8),
            starts_offset: read_u64(bytes, 16),
            ends_offset: read_u64(bytes, 24),
            values_offset: read_u64(bytes, 32),
            max_span_bits: read_u64(bytes, 40),
            reserved,
        };

        if !header.is_valid() {
            return Err(RangexError::UnsupportedFormat);
        }
        header.data_type()?;

        Ok(header)
    }

    /// Convert header to bytes array (no-std compatible)
    pub fn to_bytes_array(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];

        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes[5] = self.data_type;
        bytes[6] = self.flags;
        bytes[7] = self.reserved_0;

        write_u64(&mut bytes, 8, self.count);
        write_u64(&mut bytes, 16, self.starts_offset);
        write_u64(&mut bytes, 24, self.ends_offset);
        write_u64(&mut bytes, 32, self.values_offset);
        write_u64(&mut bytes, 40, self.max_span_bits);

        bytes[48..64].copy_from_slice(&self.reserved);

        bytes
    }
}

fn to_usize(value: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| RangexError::ArraySizeOverflow)
}

fn read_u64(bytes: &[u8], at: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(word)
}

fn write_u64(bytes: &mut [u8; RangeFileHeader::SIZE], at: usize, value: u64) {
    bytes[at..at + 8].copy_from_slice(&value.to_le_bytes());
}

/// Bound data types supported by range files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum DataType {
    /// 32-bit floating point
    F32 = 0,
    /// 64-bit floating point
    F64 = 1,
    /// 32-bit signed integer
    I32 = 2,
    /// 64-bit signed integer
    I64 = 3,
    /// 32-bit unsigned integer
    U32 = 4,
    /// 64-bit unsigned integer
    U64 = 5,
}

impl DataType {
    /// Convert from u8 representation
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(DataType::F32),
            1 => Some(DataType::F64),
            2 => Some(DataType::I32),
            3 => Some(DataType::I64),
            4 => Some(DataType::U32),
            5 => Some(DataType::U64),
            _ => None,
        }
    }

    /// Convert to u8 representation
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Get the size in bytes for this data type
    pub const fn size_bytes(self) -> usize {
        match self {
            DataType::F32 | DataType::I32 | DataType::U32 => 4,
            DataType::F64 | DataType::I64 | DataType::U64 => 8,
        }
    }

    /// Parse the lowercase name used by `Display`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "f32" => Some(DataType::F32),
            "f64" => Some(DataType::F64),
            "i32" => Some(DataType::I32),
            "i64" => Some(DataType::I64),
            "u32" => Some(DataType::U32),
            "u64" => Some(DataType::U64),
            _ => None,
        }
    }
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DataType::F32 => write!(f, "f32"),
            DataType::F64 => write!(f, "f64"),
            DataType::I32 => write!(f, "i32"),
            DataType::I64 => write!(f, "i64"),
            DataType::U32 => write!(f, "u32"),
            DataType::U64 => write!(f, "u64"),
        }
    }
}
