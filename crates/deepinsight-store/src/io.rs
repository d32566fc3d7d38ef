//! JSONL reading and atomic JSON writes

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Stream records of a JSONL file into `on_record`, one line at a time
///
/// Blank lines are ignored, invalid UTF-8 is replaced, and a line that is
/// not valid JSON for `T` is skipped. Returns the number of skipped lines;
/// only I/O errors are returned as errors.
pub fn for_each_jsonl<T, F>(path: &Path, mut on_record: F) -> std::io::Result<usize>
where
    T: DeserializeOwned,
    F: FnMut(T),
{
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut skipped = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => on_record(record),
            Err(_) => skipped += 1,
        }
    }

    Ok(skipped)
}

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}

/// Pretty-print `value` to `path` atomically, returning the bytes written
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> deepinsight_core::Result<u64> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())?;
    Ok(json.len() as u64)
}

/// Read a JSON document, propagating I/O and parse errors
pub fn read_json<T: DeserializeOwned>(path: &Path) -> deepinsight_core::Result<T> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Read a JSON document, treating a missing or unparseable file as absent
pub fn read_json_opt<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }
    match read_json(path) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable JSON file");
            None
        }
    }
}
