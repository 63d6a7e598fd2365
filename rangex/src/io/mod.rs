//! Reading and writing range datasets
//!
//! The on-disk format is picked from the file extension:
//!
//! | extension            | format                          |
//! |----------------------|---------------------------------|
//! | `.rngx`              | memory-mapped columnar binary   |
//! | `.csv`               | comma separated                 |
//! | `.tsv`, `.txt`       | tab separated                   |
//! | `.jsonl`             | JSON lines                      |

#[cfg(feature = "mmap")]
pub mod binary;
pub mod delimited;
#[cfg(feature = "serde")]
pub mod jsonl;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rangex_core::format::constants::FILE_EXTENSION;
use rangex_core::{RangeEntry, RangeIndex};

#[cfg(feature = "mmap")]
pub use binary::{load_binary, peek_data_type, read_header, RangeFile};
pub use delimited::{load_delimited, read_delimited, write_delimited, DelimitedOptions};
#[cfg(feature = "serde")]
pub use jsonl::{load_jsonl, read_jsonl, write_jsonl};

use crate::element::StoredBound;
use crate::error::{Error, Result};

/// Dataset format derived from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Columnar `.rngx` file
    Binary,
    /// Delimited text with the given separator
    Delimited(char),
    /// One JSON object per line
    JsonLines,
}

impl InputKind {
    /// Determine the format of `path` from its extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            ext if ext == FILE_EXTENSION => Ok(InputKind::Binary),
            "csv" => Ok(InputKind::Delimited(',')),
            "tsv" | "txt" => Ok(InputKind::Delimited('\t')),
            "jsonl" => Ok(InputKind::JsonLines),
            _ => Err(Error::UnsupportedInput(path.display().to_string())),
        }
    }

    /// Whether this is the columnar binary format
    pub fn is_binary(self) -> bool {
        self == InputKind::Binary
    }
}

/// Load any supported dataset with textual values
///
/// Binary value columns are rendered as decimal strings. JSON values that
/// are strings are taken verbatim; other JSON values keep their JSON text.
pub fn load_entries<T: StoredBound, P: AsRef<Path>>(
    path: P,
    options: &DelimitedOptions,
) -> Result<Vec<RangeEntry<T, String>>> {
    let path = path.as_ref();
    match InputKind::from_path(path)? {
        #[cfg(feature = "mmap")]
        InputKind::Binary => {
            let file = RangeFile::<T>::open(path)?;
            Ok(file
                .entries()
                .map(|entry| entry.map_value(|value| value.to_string()))
                .collect())
        }
        #[cfg(not(feature = "mmap"))]
        InputKind::Binary => Err(Error::UnsupportedInput(format!(
            "{} (built without mmap support)",
            path.display()
        ))),
        InputKind::Delimited(delimiter) => {
            let reader = BufReader::new(File::open(path)?);
            read_delimited(reader, &options.with_delimiter(delimiter))
        }
        #[cfg(feature = "serde")]
        InputKind::JsonLines => {
            let reader = BufReader::new(File::open(path)?);
            let entries: Vec<RangeEntry<T, serde_json::Value>> = read_jsonl(reader)?;
            Ok(entries
                .into_iter()
                .map(|entry| {
                    entry.map_value(|value| match value {
                        serde_json::Value::String(text) => text,
                        other => other.to_string(),
                    })
                })
                .collect())
        }
        #[cfg(not(feature = "serde"))]
        InputKind::JsonLines => Err(Error::UnsupportedInput(format!(
            "{} (built without serde support)",
            path.display()
        ))),
    }
}

/// Load any supported dataset into an index with textual values
pub fn load_index<T: StoredBound, P: AsRef<Path>>(
    path: P,
    options: &DelimitedOptions,
) -> Result<RangeIndex<T, String>> {
    Ok(RangeIndex::build(load_entries(path, options)?))
}

/// Save entries in the format implied by `path`
///
/// The binary format stores `u64` values: values that parse as `u64` are
/// kept, anything else is replaced by the entry's ordinal.
pub fn save_entries<T: StoredBound, P: AsRef<Path>>(
    path: P,
    entries: &[RangeEntry<T, String>],
    options: &DelimitedOptions,
) -> Result<()> {
    let path = path.as_ref();
    match InputKind::from_path(path)? {
        #[cfg(feature = "mmap")]
        InputKind::Binary => {
            let numeric: Vec<RangeEntry<T, u64>> = entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let value = entry.value.trim().parse::<u64>().unwrap_or(i as u64);
                    RangeEntry::new(entry.start, entry.end, value)
                })
                .collect();
            RangeFile::write(path, &numeric)
        }
        #[cfg(not(feature = "mmap"))]
        InputKind::Binary => Err(Error::UnsupportedInput(format!(
            "{} (built without mmap support)",
            path.display()
        ))),
        InputKind::Delimited(delimiter) => {
            let writer = BufWriter::new(File::create(path)?);
            write_delimited(writer, entries, &options.with_delimiter(delimiter))
        }
        #[cfg(feature = "serde")]
        InputKind::JsonLines => {
            let writer = BufWriter::new(File::create(path)?);
            write_jsonl(writer, entries)
        }
        #[cfg(not(feature = "serde"))]
        InputKind::JsonLines => Err(Error::UnsupportedInput(format!(
            "{} (built without serde support)",
            path.display()
        ))),
    }
}
