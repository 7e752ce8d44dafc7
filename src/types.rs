//! Public and internal types for the hashfill API and pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

/// 32-byte SHA-256 digest.
pub type Digest = [u8; 32];

/// One catalog row whose digest column is unset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Catalog key (e.g. a canonical UUID string). Written to the snapshot verbatim.
    pub key: String,
    /// File path relative to the dataset directory.
    pub relative_path: String,
    /// Dataset directory relative to the run's root directory.
    pub dataset_dir: String,
}

impl Record {
    pub fn new(
        key: impl Into<String>,
        relative_path: impl Into<String>,
        dataset_dir: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            relative_path: relative_path.into(),
            dataset_dir: dataset_dir.into(),
        }
    }

    /// `root / dataset_dir / relative_path`.
    pub fn absolute_path(&self, root: &Path) -> PathBuf {
        root.join(&self.dataset_dir).join(&self.relative_path)
    }
}

/// A record whose file was read and hashed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashedRecord {
    pub key: String,
    pub digest: Digest,
}

impl HashedRecord {
    /// Lowercase hex of the digest (64 chars).
    pub fn digest_hex(&self) -> String {
        crate::engine::hashing::digest_to_hex(&self.digest)
    }
}

/// A record whose file could not be hashed this run. Its digest stays unset in the catalog.
#[derive(Clone, Debug)]
pub struct HashFailure {
    pub key: String,
    pub path: PathBuf,
    pub reason: String,
}

/// What a worker hands to the aggregator for each record it pulled.
#[derive(Debug)]
pub enum HashOutcome {
    Hashed(HashedRecord),
    Failed(HashFailure),
}

/// Run configuration. Built once by the CLI (or a lib caller) and read-only afterwards.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Root directory; record paths resolve to `root_dir / dataset_dir / relative_path`.
    pub root_dir: PathBuf,
    /// Where the staging snapshot is written and read.
    pub snapshot_path: PathBuf,
    /// Number of hashing worker threads.
    pub num_workers: usize,
    /// Recompute digests even when a snapshot already exists.
    pub force: bool,
    /// Show progress bar and list failed paths.
    pub verbose: bool,
}

/// Orchestrator lifecycle states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Init,
    SkipToLoad,
    Recompute,
    Loaded,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Init => "init",
            RunState::SkipToLoad => "skip-to-load",
            RunState::Recompute => "recompute",
            RunState::Loaded => "loaded",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Counts reported at the end of a run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub state: RunState,
    /// True when the hashing phase ran (no snapshot, or forced).
    pub recomputed: bool,
    /// Records returned by the pending-record query.
    pub found: usize,
    /// Records hashed successfully (lines written to the snapshot).
    pub hashed: usize,
    /// Records whose file could not be read.
    pub failed: usize,
    /// Rows streamed into the staging table.
    pub staged_rows: u64,
    /// Catalog rows updated by the set-based statement.
    pub updated_rows: u64,
    /// Diagnostic of a failed load phase. The snapshot is kept for a retry.
    pub load_error: Option<String>,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self {
            state: RunState::Init,
            recomputed: false,
            found: 0,
            hashed: 0,
            failed: 0,
            staged_rows: 0,
            updated_rows: 0,
            load_error: None,
        }
    }
}
