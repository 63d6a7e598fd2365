//! Delimited text ranges (CSV, TSV)
//!
//! One range per line as `start<d>end[<d>value]`. The value is everything
//! after the second delimiter, so it may itself contain the delimiter.
//!
//! Values are escaped on write so any string survives a round trip:
//! backslash as `\\`, line breaks as `\n` and `\r`, and whitespace at either
//! edge of the value as `\s`, `\t` or `\u{hex}`. Unescaped whitespace
//! around a value is trimmed on read. Unknown escapes are kept as written.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use log::{debug, warn};
use rangex_core::{RangeEntry, RangeIndex};
use serde::{Deserialize, Serialize};

use crate::element::StoredBound;
use crate::error::{Error, Result};

/// Options for reading and writing delimited ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimitedOptions {
    /// Field separator
    pub delimiter: char,
    /// Whether the first record is a header line
    pub has_header: bool,
    /// Lines starting with this character are skipped
    pub comment: Option<char>,
}

impl DelimitedOptions {
    /// Set the field separator
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Treat the first record as a header
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set or clear the comment marker
    pub fn with_comment(mut self, comment: Option<char>) -> Self {
        self.comment = comment;
        self
    }
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: false,
            comment: Some('#'),
        }
    }
}

/// Parse delimited ranges from a reader
///
/// Blank and comment lines are skipped. A missing value becomes the empty
/// string. Entries with `start > end` are kept as-is but logged.
pub fn read_delimited<T, R>(reader: R, options: &DelimitedOptions) -> Result<Vec<RangeEntry<T, String>>>
where
    T: StoredBound,
    R: BufRead,
{
    let mut entries = Vec::new();
    let mut header_pending = options.has_header;
    let mut malformed = 0usize;

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = number + 1;
        let record = line.trim_end_matches('\r');

        if record.trim().is_empty() {
            continue;
        }
        if let Some(comment) = options.comment {
            if record.trim_start().starts_with(comment) {
                continue;
            }
        }
        if header_pending {
            header_pending = false;
            continue;
        }

        let entry = parse_record::<T>(record, options.delimiter, line_no)?;
        if !entry.is_well_formed() {
            malformed += 1;
            warn!("line {line_no}: start {} is after end {}", entry.start, entry.end);
        }
        entries.push(entry);
    }

    debug!(
        "parsed {} delimited entries ({malformed} with start > end)",
        entries.len()
    );
    Ok(entries)
}

fn parse_record<T: StoredBound>(record: &str, delimiter: char, line: usize) -> Result<RangeEntry<T, String>> {
    let mut fields = record.splitn(3, delimiter);
    let start = fields.next().unwrap_or_default();
    let end = fields.next().ok_or_else(|| Error::Parse {
        line,
        message: format!("expected at least two fields separated by {delimiter:?}"),
    })?;
    let value = fields.next().unwrap_or_default();

    Ok(RangeEntry::new(
        parse_field(start, "start", line)?,
        parse_field(end, "end", line)?,
        unescape_value(value.trim()),
    ))
}

fn unescape_value(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => value.push('\\'),
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('t') => value.push('\t'),
            Some('s') => value.push(' '),
            Some('u') => match parse_code_point(chars.as_str()) {
                Some((c, used)) => {
                    value.push(c);
                    chars = chars.as_str()[used..].chars();
                }
                None => value.push_str("\\u"),
            },
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}

/// Decode the `{hex}` tail of a `\u{hex}` escape and its length in bytes
fn parse_code_point(tail: &str) -> Option<(char, usize)> {
    let digits = tail.strip_prefix('{')?;
    let close = digits.find('}')?;
    let code = u32::from_str_radix(&digits[..close], 16).ok()?;
    Some((char::from_u32(code)?, close + 2))
}

fn escape_value(value: &str) -> String {
    let edge_start = value.len() - value.trim_start().len();
    let edge_end = value.trim_end().len();
    let mut escaped = String::with_capacity(value.len());
    for (at, c) in value.char_indices() {
        let at_edge = at < edge_start || at >= edge_end;
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' if at_edge => escaped.push_str("\\t"),
            ' ' if at_edge => escaped.push_str("\\s"),
            c if at_edge && c.is_whitespace() => {
                escaped.push_str(&format!("\\u{{{:x}}}", c as u32));
            }
            c => escaped.push(c),
        }
    }
    escaped
}

fn parse_field<T: StoredBound>(text: &str, name: &str, line: usize) -> Result<T> {
    let text = text.trim();
    text.parse().map_err(|_| Error::Parse {
        line,
        message: format!("invalid {name} {text:?} for {}", T::data_type()),
    })
}

/// Write ranges as delimited text
///
/// Values are escaped so that [`read_delimited`] returns them unchanged.
pub fn write_delimited<'a, T, V, W, I>(mut writer: W, entries: I, options: &DelimitedOptions) -> Result<()>
where
    T: StoredBound,
    V: std::fmt::Display + 'a,
    W: Write,
    I: IntoIterator<Item = &'a RangeEntry<T, V>>,
{
    let d = options.delimiter;
    if options.has_header {
        writeln!(writer, "start{d}end{d}value")?;
    }
    for entry in entries {
        let value = escape_value(&entry.value.to_string());
        writeln!(writer, "{}{d}{}{d}{value}", entry.start, entry.end)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a delimited file into an index
pub fn load_delimited<T: StoredBound, P: AsRef<Path>>(
    path: P,
    options: &DelimitedOptions,
) -> Result<RangeIndex<T, String>> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let entries = read_delimited::<T, _>(reader, options)?;
    Ok(RangeIndex::build(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_basic() {
        let text = "0,5,a\n4,9,b\n\n# comment\n10,12,c\n";
        let entries = read_delimited::<f64, _>(text.as_bytes(), &DelimitedOptions::default()).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1], RangeEntry::new(4.0, 9.0, "b".to_string()));

        let index = RangeIndex::build(entries);
        let hits: Vec<&str> = index
            .query_range(3.0, 4.0)
            .iter()
            .map(|entry| entry.value.as_str())
            .collect();
        assert_eq!(hits, vec!["a", "b"]);
        assert_eq!(index.query_range(12.0, 20.0)[0].value, "c");
    }

    #[test]
    fn test_header_missing_value_and_padding() {
        let text = "start\tend\tvalue\n 1 \t 3 \n2\t8\tgene\twith\ttabs\r\n";
        let options = DelimitedOptions::default().with_delimiter('\t').with_header(true);
        let entries = read_delimited::<i64, _>(text.as_bytes(), &options).unwrap();

        assert_eq!(entries[0], RangeEntry::new(1, 3, String::new()));
        assert_eq!(entries[1].value, "gene\twith\ttabs");
    }

    #[test]
    fn test_parse_errors_report_line() {
        let text = "1,2,ok\n\n3;4\n";
        let err = read_delimited::<u32, _>(text.as_bytes(), &DelimitedOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 3, .. }));

        let err = read_delimited::<u32, _>("1,-2\n".as_bytes(), &DelimitedOptions::default()).unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("end"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_malformed_rows_are_kept() {
        let entries = read_delimited::<i32, _>("9,2,x\n".as_bytes(), &DelimitedOptions::default()).unwrap();
        assert_eq!(entries, vec![RangeEntry::new(9, 2, "x".to_string())]);
    }

    #[test]
    fn test_write_then_read() {
        let entries = vec![
            RangeEntry::new(0u64, 5, "a,b"),
            RangeEntry::new(7, 7, ""),
        ];
        let options = DelimitedOptions::default().with_header(true);
        let mut buffer = Vec::new();
        write_delimited(&mut buffer, &entries, &options).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "start,end,value\n0,5,a,b\n7,7,\n");

        let back = read_delimited::<u64, _>(text.as_bytes(), &options).unwrap();
        assert_eq!(back[0].value, "a,b");
        assert_eq!(back[1], RangeEntry::new(7, 7, String::new()));
    }

    #[test]
    fn test_awkward_values_survive_a_round_trip() {
        let values = [
            "line one\nline two",
            "C:\\temp\\new",
            "  padded\t",
            "\r\n",
            "tab\tinside",
            "\u{a0}nbsp",
            "\\s is not a space",
        ];
        let entries: Vec<RangeEntry<i32, &str>> = values
            .iter()
            .enumerate()
            .map(|(i, value)| RangeEntry::new(i as i32, i as i32 + 1, *value))
            .collect();

        for options in [
            DelimitedOptions::default(),
            DelimitedOptions::default().with_delimiter('\t').with_header(true),
        ] {
            let mut buffer = Vec::new();
            write_delimited(&mut buffer, &entries, &options).unwrap();
            let text = String::from_utf8(buffer).unwrap();
            let header = usize::from(options.has_header);
            assert_eq!(text.lines().count(), values.len() + header);

            let back = read_delimited::<i32, _>(text.as_bytes(), &options).unwrap();
            let back: Vec<&str> = back.iter().map(|entry| entry.value.as_str()).collect();
            assert_eq!(back, values);
        }
    }

    #[test]
    fn test_escapes_in_hand_written_values() {
        let text = "0,1, a\\sb\\n \n1,2,\\q\\\n2,3,\\u{zz}\n";
        let entries = read_delimited::<i32, _>(text.as_bytes(), &DelimitedOptions::default()).unwrap();
        assert_eq!(entries[0].value, "a b\n");
        assert_eq!(entries[1].value, "\\q\\");
        assert_eq!(entries[2].value, "\\u{zz}");
    }

    #[test]
    fn test_load_delimited_file() {
        let path = std::env::temp_dir().join(format!("rangex-delimited-{}.csv", std::process::id()));
        std::fs::write(&path, "0,1,first\n100,101,second\n").unwrap();

        let index = load_delimited::<i64, _>(&path, &DelimitedOptions::default()).unwrap();
        assert_eq!(index.max_span(), 1);
        assert_eq!(index.query_point(100)[0].value, "second");
        assert!(index.query_point(50).is_empty());

        std::fs::remove_file(&path).unwrap();
    }
}
