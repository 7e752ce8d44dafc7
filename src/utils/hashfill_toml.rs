//! Load `hashfill.toml` (CLI only). Lib callers build [`Opts`](crate::Opts) and a store themselves.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct HashfillToml {
    #[serde(default)]
    pub settings: SettingsSection,
    #[serde(default)]
    pub database: DatabaseSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsSection {
    pub root_dir: Option<String>,
    pub csv_path: Option<String>,
    pub threads: Option<usize>,
    pub verbose: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DatabaseSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    /// SQLite catalog file; when set, no server connection is made.
    pub sqlite: Option<String>,
}

/// Load config from `explicit` if given, else `hashfill.toml` in `dir`.
///
/// `Ok(None)` only when no path was given and the default file is absent. An explicit path that
/// cannot be read, or any file that does not parse, is an error.
pub fn load_hashfill_toml(explicit: Option<&Path>, dir: &Path) -> Result<Option<HashfillToml>> {
    let path: PathBuf = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let default = dir.join(crate::utils::config::PackagePaths::get().config_filename());
            if !default.is_file() {
                return Ok(None);
            }
            default
        }
    };
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("read config file {}", path.display()))?;
    let cfg = toml::from_str(&s).with_context(|| format!("parse config file {}", path.display()))?;
    Ok(Some(cfg))
}

/// CLI value wins, then file value, then default.
macro_rules! layered {
    ($cli:expr, $file:expr, $default:expr) => {
        $cli.or($file).unwrap_or($default)
    };
}
pub(crate) use layered;
