//! Bulk loader: stream the snapshot into a staging table, then one set-based update.

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::db_ops::CatalogStore;
use crate::engine::snapshot::open_snapshot;

/// Rows moved by one load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub staged_rows: u64,
    pub updated_rows: u64,
}

fn is_cancelled(cancel: Option<&Arc<AtomicBool>>) -> bool {
    cancel.is_some_and(|c| c.load(Ordering::Relaxed))
}

/// Snapshot reader that fails once the cancel flag is set, which aborts the bulk copy.
struct CancellableRead<'a, R> {
    inner: R,
    cancel: Option<&'a Arc<AtomicBool>>,
}

impl<R: Read> Read for CancellableRead<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if is_cancelled(self.cancel) {
            return Err(io::Error::other("load cancelled by user"));
        }
        self.inner.read(buf)
    }
}

/// Load the snapshot at `snapshot_path` into the catalog.
pub fn load_snapshot<S: CatalogStore + ?Sized>(
    store: &mut S,
    snapshot_path: &Path,
) -> Result<LoadReport> {
    load_snapshot_cancellable(store, snapshot_path, None)
}

/// Load the snapshot, giving up as soon as `cancel` is set.
///
/// 1. create the staging table, 2. stream every snapshot line into it, 3. one `UPDATE ... FROM`.
/// A failed or cancelled step aborts the load before any catalog row is touched by a later step.
/// The staging table is dropped afterwards either way; the snapshot file is never modified.
pub fn load_snapshot_cancellable<S: CatalogStore + ?Sized>(
    store: &mut S,
    snapshot_path: &Path,
    cancel: Option<&Arc<AtomicBool>>,
) -> Result<LoadReport> {
    let snapshot = open_snapshot(snapshot_path)?;
    let mut snapshot = CancellableRead {
        inner: snapshot,
        cancel,
    };
    store.create_staging_table()?;

    let result = stage_and_apply(store, &mut snapshot, cancel);

    if let Err(e) = store.drop_staging_table() {
        warn!("Could not drop staging table: {:#}", e);
    }
    result
}

fn stage_and_apply<S: CatalogStore + ?Sized>(
    store: &mut S,
    snapshot: &mut dyn Read,
    cancel: Option<&Arc<AtomicBool>>,
) -> Result<LoadReport> {
    let staged_rows = store
        .copy_into_staging(snapshot)
        .context("bulk ingestion into staging table")?;
    debug!("Staged {} rows", staged_rows);

    if is_cancelled(cancel) {
        bail!("load cancelled by user before applying staged digests");
    }
    let updated_rows = store.apply_staged_digests()?;
    debug!("Updated {} catalog rows", updated_rows);

    Ok(LoadReport {
        staged_rows,
        updated_rows,
    })
}
