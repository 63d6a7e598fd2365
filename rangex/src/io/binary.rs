//! Memory-mapped columnar range files (`.rngx`)
//!
//! The file is a [`RangeFileHeader`] followed by the start column, the end
//! column and an optional `u64` value column. Columns are written in native
//! little-endian layout, so opening a file only validates the header and
//! reinterprets the mapped bytes; nothing is copied until an index is built.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::marker::PhantomData;
use std::ops::Range;
use std::path::Path;

use log::{debug, info};
use memmap2::{Mmap, MmapOptions};
use rangex_core::format::constants::{flags, ALIGNMENT_BOUNDARY};
use rangex_core::validation::{
    calculate_padding, validate_column, validate_offset_alignment, validate_typed_slice,
};
use rangex_core::{Bound, DataType, RangeEntry, RangeFileHeader, RangeIndex, RangexError};

use crate::element::StoredBound;
use crate::error::{Error, Result};

/// Read-only view of a memory-mapped range file
pub struct RangeFile<T: StoredBound> {
    mmap: Mmap,
    header: RangeFileHeader,
    starts: Range<usize>,
    ends: Range<usize>,
    values: Option<Range<usize>>,
    _bound: PhantomData<T>,
}

impl<T: StoredBound> RangeFile<T> {
    /// Map a range file and validate its layout
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        ensure_little_endian()?;
        let path = path.as_ref();
        let file = File::open(path)?;

        // SAFETY: read-only mapping; every column is bounds and alignment
        // checked below before it is reinterpreted
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        let header = RangeFileHeader::from_bytes(&mmap)?;
        let found = header.data_type()?;
        if found != T::data_type() {
            return Err(Error::DataTypeMismatch {
                expected: T::data_type(),
                found,
            });
        }

        let starts = checked_column::<T>(&mmap, header.starts_region()?)?;
        let ends = checked_column::<T>(&mmap, header.ends_region()?)?;
        let values = match header.values_region()? {
            Some(region) => Some(checked_column::<u64>(&mmap, region)?),
            None => None,
        };

        debug!(
            "mapped {} ({} entries of {}, sorted: {}, values: {})",
            path.display(),
            header.count,
            found,
            header.is_sorted(),
            values.is_some()
        );

        Ok(Self {
            mmap,
            header,
            starts,
            ends,
            values,
            _bound: PhantomData,
        })
    }

    /// File header
    pub fn header(&self) -> &RangeFileHeader {
        &self.header
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.starts().len()
    }

    /// Whether the file holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start column
    pub fn starts(&self) -> &[T] {
        bytemuck::cast_slice(&self.mmap[self.starts.clone()])
    }

    /// End column
    pub fn ends(&self) -> &[T] {
        bytemuck::cast_slice(&self.mmap[self.ends.clone()])
    }

    /// Value column, if the file has one
    pub fn values(&self) -> Option<&[u64]> {
        self.values
            .as_ref()
            .map(|range| bytemuck::cast_slice(&self.mmap[range.clone()]))
    }

    /// Iterate stored entries in file order
    ///
    /// Files without a value column yield each entry's ordinal as its value.
    pub fn entries(&self) -> impl Iterator<Item = RangeEntry<T, u64>> + '_ {
        let values = self.values();
        self.starts()
            .iter()
            .zip(self.ends())
            .enumerate()
            .map(move |(i, (&start, &end))| {
                let value = values.map_or(i as u64, |values| values[i]);
                RangeEntry::new(start, end, value)
            })
    }

    /// Copy the entries into a [`RangeIndex`]
    pub fn to_index(&self) -> RangeIndex<T, u64> {
        RangeIndex::build(self.entries())
    }

    /// Write entries in the given order
    pub fn write<P: AsRef<Path>>(path: P, entries: &[RangeEntry<T, u64>]) -> Result<()> {
        let starts: Vec<T> = entries.iter().map(|entry| entry.start).collect();
        let ends: Vec<T> = entries.iter().map(|entry| entry.end).collect();
        let values: Vec<u64> = entries.iter().map(|entry| entry.value).collect();
        let max_span = fold_max_span(entries);
        write_columns(path.as_ref(), &starts, &ends, Some(values.as_slice()), max_span, false)
    }

    /// Write an index in its sorted order, marking the file as sorted
    pub fn write_index<P: AsRef<Path>>(path: P, index: &RangeIndex<T, u64>) -> Result<()> {
        let starts: Vec<T> = index.values().map(|entry| entry.start).collect();
        let ends: Vec<T> = index.values().map(|entry| entry.end).collect();
        let values: Vec<u64> = index.values().map(|entry| entry.value).collect();
        write_columns(
            path.as_ref(),
            &starts,
            &ends,
            Some(values.as_slice()),
            index.max_span(),
            true,
        )
    }
}

/// Read only the header of a range file
pub fn read_header<P: AsRef<Path>>(path: P) -> Result<RangeFileHeader> {
    let mut file = File::open(path.as_ref())?;
    let mut bytes = [0u8; RangeFileHeader::SIZE];
    file.read_exact(&mut bytes)?;
    Ok(RangeFileHeader::from_bytes(&bytes)?)
}

/// Bound type stored in a range file
pub fn peek_data_type<P: AsRef<Path>>(path: P) -> Result<DataType> {
    Ok(read_header(path)?.data_type()?)
}

/// Map a range file and build an index from it
pub fn load_binary<T: StoredBound, P: AsRef<Path>>(path: P) -> Result<RangeIndex<T, u64>> {
    let file = RangeFile::<T>::open(path)?;
    Ok(file.to_index())
}

fn ensure_little_endian() -> Result<()> {
    if cfg!(target_endian = "big") {
        return Err(RangexError::UnsupportedFormat.into());
    }
    Ok(())
}

fn checked_column<E: bytemuck::Pod>(bytes: &[u8], (offset, len): (usize, usize)) -> Result<Range<usize>> {
    validate_column(offset, len, RangeFileHeader::SIZE, bytes.len())?;
    validate_offset_alignment(offset, ALIGNMENT_BOUNDARY)?;
    let range = offset..offset + len;
    validate_typed_slice::<E>(&bytes[range.clone()])?;
    Ok(range)
}

fn fold_max_span<T: Bound>(entries: &[RangeEntry<T, u64>]) -> T {
    entries
        .iter()
        .filter(|entry| entry.end > entry.start)
        .map(|entry| entry.span())
        .fold(T::zero(), |max, span| if span > max { span } else { max })
}

pub(crate) fn write_columns<T: StoredBound>(
    path: &Path,
    starts: &[T],
    ends: &[T],
    values: Option<&[u64]>,
    max_span: T,
    sorted: bool,
) -> Result<()> {
    ensure_little_endian()?;

    let mut header =
        RangeFileHeader::with_layout(T::data_type(), starts.len() as u64, values.is_some())?;
    header.max_span_bits = max_span.to_bits_u64();
    if sorted {
        header.flags |= flags::SORTED_BY_START;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    let mut position = 0usize;

    let header_bytes = header.to_bytes_array();
    writer.write_all(&header_bytes)?;
    position += header_bytes.len();

    let (starts_offset, _) = header.starts_region()?;
    position = write_column(&mut writer, position, starts_offset, bytemuck::cast_slice(starts))?;
    let (ends_offset, _) = header.ends_region()?;
    position = write_column(&mut writer, position, ends_offset, bytemuck::cast_slice(ends))?;
    if let (Some(values), Some((values_offset, _))) = (values, header.values_region()?) {
        write_column(&mut writer, position, values_offset, bytemuck::cast_slice(values))?;
    }

    writer.flush()?;
    info!(
        "wrote {} entries of {} to {}",
        header.count,
        T::data_type(),
        path.display()
    );
    Ok(())
}

fn write_column<W: Write>(writer: &mut W, position: usize, offset: usize, bytes: &[u8]) -> Result<usize> {
    let padding = calculate_padding(position, ALIGNMENT_BOUNDARY);
    if position + padding != offset {
        return Err(RangexError::CorruptedData.into());
    }
    writer.write_all(&[0u8; ALIGNMENT_BOUNDARY][..padding])?;
    writer.write_all(bytes)?;
    Ok(offset + bytes.len())
}
