use crossbeam_channel::Sender;
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use super::work_queue::WorkQueue;
use crate::engine::hashing::digest_file;
use crate::{HashFailure, HashOutcome, HashedRecord, Record};

/// Hash one record's file. Read errors become a [`HashFailure`] naming the path.
pub fn hash_record(record: Record, root: &Path) -> HashOutcome {
    let path = record.absolute_path(root);
    match digest_file(&path) {
        Ok(digest) => HashOutcome::Hashed(HashedRecord {
            key: record.key,
            digest,
        }),
        Err(e) => {
            warn!("Failed to read file: {} ({})", path.display(), e);
            HashOutcome::Failed(HashFailure {
                key: record.key,
                path,
                reason: e.to_string(),
            })
        }
    }
}

/// Single hashing worker: pop until the queue is empty (or cancel is set), send each outcome.
fn hash_worker_loop(
    queue: WorkQueue,
    outcome_tx: Sender<HashOutcome>,
    root: PathBuf,
    cancel: Option<Arc<AtomicBool>>,
) {
    loop {
        if cancel.as_ref().is_some_and(|c| c.load(Ordering::Relaxed)) {
            break;
        }
        let Some(record) = queue.pop() else {
            break;
        };
        if outcome_tx.send(hash_record(record, &root)).is_err() {
            break;
        }
    }
}

/// Spawn `num_workers` hashing threads over `queue`. Caller must drop its sender after this so the
/// aggregator sees the channel close once every worker has exited.
pub fn spawn_hash_workers(
    queue: &WorkQueue,
    outcome_tx: &Sender<HashOutcome>,
    root: &Path,
    num_workers: usize,
    cancel: Option<&Arc<AtomicBool>>,
) -> Vec<JoinHandle<()>> {
    (0..num_workers)
        .map(|_| {
            let queue = queue.clone();
            let outcome_tx = outcome_tx.clone();
            let root = root.to_path_buf();
            let cancel = cancel.map(Arc::clone);
            thread::spawn(move || hash_worker_loop(queue, outcome_tx, root, cancel))
        })
        .collect()
}
