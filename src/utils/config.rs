//! Application configuration constants.
//! Defaults and tuning in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    password_env_key: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!("{pkg}.toml"),
                password_env_key: format!("{}_DB_PASSWORD", pkg.to_uppercase()),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Config file looked up in the current directory when `--config` is not given.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Env var holding the database password (e.g. `HASHFILL_DB_PASSWORD`).
    pub fn password_env_key(&self) -> &str {
        &self.password_env_key
    }
}

// ---- Run defaults ----

/// CLI / config defaults.
pub struct RunDefaults;

impl RunDefaults {
    pub const SNAPSHOT_PATH: &'static str = "/tmp/image_hashes.csv";
    pub const NUM_WORKERS: usize = 8;
    pub const HOST: &'static str = "localhost";
    pub const PORT: u16 = 5432;
    pub const DBNAME: &'static str = "your_db";
    pub const USER: &'static str = "your_user";
}

// ---- Hashing ----

/// Hashing I/O buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// Chunk size for streaming file contents into the hasher (bytes). 128 KB.
    pub const HASH_READ_CHUNK_SIZE: usize = 128 * 1024;
}

// ---- Progress ----

pub struct ProgressConsts;

impl ProgressConsts {
    /// Outcomes received before the progress bar is advanced (reduce refresh churn).
    pub const PROGRESS_UPDATE_BATCH_SIZE: usize = 100;
}

// ---- Staging ----

/// Buffer size for snapshot writes and reads (bytes).
pub const SNAPSHOT_IO_BUFFER: usize = 256 * 1024;
