use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Temporary sibling path used while writing `path` (e.g. `image_hashes.csv.tmp`).
pub fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(env!("CARGO_PKG_NAME"));
    path.parent()
        .unwrap_or(Path::new("."))
        .join(format!("{name}.tmp"))
}

/// Remove a stale temp file left by an interrupted write. Missing file is fine.
pub fn remove_stale_temp(temp_path: &Path) -> Result<()> {
    match fs::remove_file(temp_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e)
            .with_context(|| format!("remove stale temp file at {}", temp_path.display())),
    }
}

pub fn rename_temp_to_final(temp_path: &Path, final_path: &Path) -> Result<()> {
    fs::rename(temp_path, final_path).with_context(|| {
        format!(
            "atomic rename temp file to final path ({} -> {})",
            temp_path.display(),
            final_path.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_is_sibling() {
        assert_eq!(
            temp_path_for(Path::new("/tmp/image_hashes.csv")),
            PathBuf::from("/tmp/image_hashes.csv.tmp")
        );
    }

    #[test]
    fn remove_missing_temp_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert!(remove_stale_temp(&dir.path().join("nope.tmp")).is_ok());
    }
}
