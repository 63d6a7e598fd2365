//! Rangex - range index with memory-mapped loading, generation and benchmarking
//!
//! The index itself lives in `rangex-core`, which has no I/O. This crate adds
//! the collaborators around it.
//!
//! ## Architecture
//!
//! - **rangex-core**: range entity, numeric bound trait, the index, file format definitions
//! - **rangex**: file loaders and writers, dataset generator, query benchmark, CLI
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rangex::{generate, load_binary, GeneratorConfig, RangeFile, RangeIndex};
//!
//! fn example() -> rangex::Result<()> {
//!     let entries = generate::<f64>(&GeneratorConfig::with_count(1_000_000))?;
//!     RangeFile::write_index("ranges.rngx", &RangeIndex::build(entries))?;
//!
//!     let index = load_binary::<f64, _>("ranges.rngx")?;
//!     for hit in index.query_range(1_000.0, 2_000.0) {
//!         println!("[{}, {}] -> {}", hit.start, hit.end, hit.value);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **mmap** (default): memory-mapped `.rngx` files
//! - **serde** (default): serde derives on core types and JSON lines support
//! - **cli** (default): the `rangex` binary

pub use rangex_core::{
    // Index
    Bound, Containing, Overlapping, RangeEntry, RangeIndex,
    // Format definitions
    DataType, RangeFileHeader,
    // Core errors and parsing
    RangexError, parse_interval, parse_point,
};

pub mod bench;
pub mod config;
pub mod element;
pub mod error;
pub mod generate;
pub mod io;

pub use bench::{naive_point, naive_range, par_query_ranges, time_build, BenchReport, Query, QueryBench};
pub use config::{BenchConfig, GeneratorConfig, RangexConfig, SpanDistribution};
pub use element::StoredBound;
pub use error::{Error, Result};
pub use generate::{generate, random_queries};
pub use io::{load_delimited, load_entries, load_index, save_entries, DelimitedOptions, InputKind};

#[cfg(feature = "mmap")]
pub use io::{load_binary, peek_data_type, RangeFile};

#[cfg(feature = "serde")]
pub use io::{load_jsonl, read_jsonl, write_jsonl};
