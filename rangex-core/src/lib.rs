#![no_std]

//! Rangex Core - sorted-start range index with max-span pruning
//!
//! This crate provides the range entity, the numeric bound trait, the
//! immutable index built on them, and the pure definitions of the columnar
//! range file format. It performs no I/O.
//!
//! ```rust
//! use rangex_core::{RangeEntry, RangeIndex};
//!
//! let index = RangeIndex::build(vec![
//!     RangeEntry::new(0.0, 5.0, "a"),
//!     RangeEntry::new(4.0, 9.0, "b"),
//!     RangeEntry::new(10.0, 12.0, "c"),
//! ]);
//!
//! let hits: Vec<_> = index.query_range(3.0, 4.0).iter().map(|r| r.value).collect();
//! assert_eq!(hits, ["a", "b"]);
//! assert_eq!(index.query_point(9.0)[0].value, "b");
//! ```

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod entry;
pub mod error;
pub mod format;
#[cfg(feature = "alloc")]
pub mod index;
pub mod traits;
pub mod validation;

pub use entry::RangeEntry;
pub use error::*;
pub use format::*;
#[cfg(feature = "alloc")]
pub use index::{Containing, Overlapping, RangeIndex};
pub use traits::*;
pub use validation::{parse_interval, parse_point, validate_array_bounds};
