use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

/// Root directory must exist and be a directory. Returns the canonical path.
pub fn check_root_dir(path: &Path) -> Result<PathBuf> {
    let root = path
        .canonicalize()
        .with_context(|| format!("root directory {}", path.display()))?;
    if !root.is_dir() {
        bail!("root directory is not a directory: {}", root.display());
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_root_dir(dir.path()).is_ok());
    }

    #[test]
    fn rejects_file_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, b"x").unwrap();
        assert!(check_root_dir(&file).is_err());
        assert!(check_root_dir(&dir.path().join("missing")).is_err());
    }
}
