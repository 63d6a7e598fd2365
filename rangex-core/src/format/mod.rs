//! Binary format definitions for columnar range files
//!
//! This module contains pure data structure definitions for the on-disk
//! layout. No I/O happens here.

pub mod constants;
pub mod header;

pub use header::{DataType, RangeFileHeader};
