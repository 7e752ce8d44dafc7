//! Staging snapshot: `key,hex_digest` lines on disk, decoupled from the database.
//!
//! The snapshot is the only thing the bulk loader reads. It is written to a sibling `.tmp` file and
//! renamed into place, so a snapshot that exists at the configured path is always complete.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::HashedRecord;
use crate::utils::config::SNAPSHOT_IO_BUFFER;
use crate::utils::{remove_stale_temp, rename_temp_to_final, temp_path_for};

/// One snapshot line, newline-terminated.
pub fn snapshot_line(record: &HashedRecord) -> String {
    format!("{},{}\n", record.key, record.digest_hex())
}

/// Write one line per record to `path`, replacing any previous snapshot. Returns lines written.
pub fn write_snapshot(path: &Path, records: &[HashedRecord]) -> Result<usize> {
    let temp_path = temp_path_for(path);
    remove_stale_temp(&temp_path)?;

    let file = File::create(&temp_path)
        .with_context(|| format!("create snapshot temp file {}", temp_path.display()))?;
    let mut out = BufWriter::with_capacity(SNAPSHOT_IO_BUFFER, file);
    for record in records {
        out.write_all(snapshot_line(record).as_bytes())
            .context("write snapshot line")?;
    }
    let file = out
        .into_inner()
        .map_err(|e| e.into_error())
        .context("flush snapshot")?;
    file.sync_all().context("sync snapshot")?;
    drop(file);

    rename_temp_to_final(&temp_path, path)?;
    Ok(records.len())
}

/// True when a snapshot is present at `path` and can be opened for reading.
pub fn snapshot_ready(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

/// Open the snapshot for streaming into the staging table.
pub fn open_snapshot(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("open snapshot {}", path.display()))?;
    Ok(BufReader::with_capacity(SNAPSHOT_IO_BUFFER, file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(key: &str, byte: u8) -> HashedRecord {
        HashedRecord {
            key: key.to_string(),
            digest: [byte; 32],
        }
    }

    #[test]
    fn line_format() {
        let line = snapshot_line(&rec("a1", 0x01));
        assert_eq!(line, format!("a1,{}\n", "01".repeat(32)));
    }

    #[test]
    fn write_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hashes.csv");
        write_snapshot(&path, &[rec("a", 1), rec("b", 2), rec("c", 3)]).unwrap();
        write_snapshot(&path, &[rec("z", 9)]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, format!("z,{}\n", "09".repeat(32)));
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn empty_result_set_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hashes.csv");
        assert_eq!(write_snapshot(&path, &[]).unwrap(), 0);
        assert!(snapshot_ready(&path));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn missing_snapshot_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!snapshot_ready(&dir.path().join("hashes.csv")));
        assert!(!snapshot_ready(dir.path()));
    }
}
