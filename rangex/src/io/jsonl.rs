//! JSON lines ranges, one `{"start":..,"end":..,"value":..}` object per line

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use log::{debug, warn};
use rangex_core::{Bound, RangeEntry, RangeIndex};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Parse JSON lines from a reader, skipping blank lines
pub fn read_jsonl<T, V, R>(reader: R) -> Result<Vec<RangeEntry<T, V>>>
where
    T: Bound + DeserializeOwned + std::fmt::Debug,
    V: DeserializeOwned,
    R: BufRead,
{
    let mut entries = Vec::new();
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: RangeEntry<T, V> = serde_json::from_str(&line).map_err(|error| Error::Parse {
            line: number + 1,
            message: error.to_string(),
        })?;
        if !entry.is_well_formed() {
            warn!(
                "line {}: start {:?} is after end {:?}",
                number + 1,
                entry.start,
                entry.end
            );
        }
        entries.push(entry);
    }
    debug!("parsed {} JSON lines entries", entries.len());
    Ok(entries)
}

/// Write ranges as JSON lines
pub fn write_jsonl<'a, T, V, W, I>(mut writer: W, entries: I) -> Result<()>
where
    T: Serialize + 'a,
    V: Serialize + 'a,
    W: Write,
    I: IntoIterator<Item = &'a RangeEntry<T, V>>,
{
    for entry in entries {
        serde_json::to_writer(&mut writer, entry)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a JSON lines file into an index
pub fn load_jsonl<T, V, P>(path: P) -> Result<RangeIndex<T, V>>
where
    T: Bound + DeserializeOwned + std::fmt::Debug,
    V: DeserializeOwned,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path.as_ref())?);
    Ok(RangeIndex::build(read_jsonl(reader)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_structured_values() {
        let text = r#"{"start":0,"end":5,"value":{"name":"a"}}

{"start":4,"end":9,"value":{"name":"b"}}
"#;
        let entries: Vec<RangeEntry<i64, serde_json::Value>> = read_jsonl(text.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].value["name"], "b");
    }

    #[test]
    fn test_write_then_read() {
        let entries = vec![
            RangeEntry::new(0.5f64, 1.5, "x".to_string()),
            RangeEntry::new(2.0, 2.0, "y".to_string()),
        ];
        let mut buffer = Vec::new();
        write_jsonl(&mut buffer, &entries).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with(r#"{"start":0.5,"end":1.5,"value":"x"}"#));

        let back: Vec<RangeEntry<f64, String>> = read_jsonl(text.as_bytes()).unwrap();
        assert_eq!(back, entries);
    }

    #[test]
    fn test_bad_line_is_reported() {
        let text = "{\"start\":1,\"end\":2,\"value\":null}\n{\"start\":\"oops\"}\n";
        let result: Result<Vec<RangeEntry<u32, ()>>> = read_jsonl(text.as_bytes());
        assert!(matches!(result, Err(Error::Parse { line: 2, .. })));
    }

    #[test]
    fn test_load_jsonl_file() {
        let path = std::env::temp_dir().join(format!("rangex-jsonl-{}.jsonl", std::process::id()));
        std::fs::write(&path, "{\"start\":5,\"end\":10,\"value\":1}\n{\"start\":10,\"end\":15,\"value\":2}\n").unwrap();

        let index: RangeIndex<u32, u8> = load_jsonl(&path).unwrap();
        let hits: Vec<u8> = index.query_point(10).iter().map(|entry| entry.value).collect();
        assert_eq!(hits, vec![1, 2]);

        std::fs::remove_file(&path).unwrap();
    }
}
