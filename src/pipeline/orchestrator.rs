use anyhow::Result;
use crossbeam_channel::unbounded;
use log::debug;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::Record;
use crate::engine::progress::{ProgressBar, finish_bar, hashing_bar};
use crate::pipeline::{self, Aggregated, WorkQueue};
use crate::utils::cap_workers;

/// Resolve the worker count: requested, capped by FD budget, never more than there are records.
pub fn resolve_workers(requested: usize, total: usize) -> usize {
    cap_workers(requested).min(total).max(1)
}

/// Queue `records` and start the hashing pool. Returns receiver and handles; caller receives from
/// `outcome_rx` and must join `worker_handles` when done.
pub fn run_pipeline(
    records: Vec<Record>,
    root: &Path,
    num_workers: usize,
    cancel: Option<&Arc<AtomicBool>>,
) -> pipeline::PipelineHandles {
    let total = records.len();
    let num_workers = resolve_workers(num_workers, total);
    debug!("Hashing {} records with {} workers", total, num_workers);

    let queue = WorkQueue::new(records);
    let (outcome_tx, outcome_rx) = unbounded();
    let worker_handles =
        pipeline::spawn_hash_workers(&queue, &outcome_tx, root, num_workers, cancel);

    // Dropping the last sender closes the channel once every worker has exited.
    drop(outcome_tx);

    pipeline::PipelineHandles {
        outcome_rx,
        worker_handles,
        tuning: pipeline::PipelineTuning { num_workers, total },
    }
}

/// Shut down the pool by joining every worker (after the outcome stream is drained).
pub fn shutdown_pipeline_handles(worker_handles: Vec<std::thread::JoinHandle<()>>) -> Result<()> {
    let mut panicked = 0_usize;
    for h in worker_handles {
        if h.join().is_err() {
            panicked += 1;
        }
    }
    if panicked > 0 {
        anyhow::bail!("{} hashing worker(s) panicked", panicked);
    }
    Ok(())
}

/// Hash every record: queue → workers → aggregator, then join. Returns only after the last worker
/// has exited.
pub fn collect_hashes(
    records: Vec<Record>,
    root: &Path,
    num_workers: usize,
    verbose: bool,
    cancel: Option<&Arc<AtomicBool>>,
) -> Result<Aggregated> {
    let bar: Option<ProgressBar> = hashing_bar(verbose, records.len());
    let pipeline::PipelineHandles {
        outcome_rx,
        worker_handles,
        tuning,
    } = run_pipeline(records, root, num_workers, cancel);

    let agg = pipeline::collect_outcomes(outcome_rx, bar.as_ref());
    shutdown_pipeline_handles(worker_handles)?;
    if let Some(ref pb) = bar {
        finish_bar(pb);
    }
    debug!(
        "main: channel closed, {} of {} records accounted for (hashing phase done)",
        agg.total(),
        tuning.total
    );
    Ok(agg)
}
