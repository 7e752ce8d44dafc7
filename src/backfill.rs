//! Backfill run: decide recompute vs. reuse, hash, stage, bulk-load.

use anyhow::{Context, Result, bail};
use log::{debug, error, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::db_ops::CatalogStore;
use crate::engine::loader::load_snapshot_cancellable;
use crate::engine::snapshot::{snapshot_ready, write_snapshot};
use crate::pipeline::{collect_hashes, report_hash_failures};
use crate::utils::Colors;
use crate::{Opts, RunState, RunSummary};

fn transition(summary: &mut RunSummary, next: RunState) {
    debug!("state: {} -> {}", summary.state, next);
    summary.state = next;
}

/// Recompute unless a readable snapshot exists and `force` is off.
pub fn should_recompute(opts: &Opts) -> bool {
    opts.force || !snapshot_ready(&opts.snapshot_path)
}

/// Run one backfill against an already-connected `store`.
///
/// Per-file read failures are counted, never returned. A failed load phase is reported in
/// [`RunSummary::load_error`] with the snapshot left in place. `Err` means the run could not
/// proceed (query failure, snapshot write failure) or was cancelled. Cancelling while hashing
/// writes no snapshot; cancelling during the load leaves the catalog and the snapshot unchanged.
pub fn backfill<S: CatalogStore + ?Sized>(
    store: &mut S,
    opts: &Opts,
    cancel: Option<&Arc<AtomicBool>>,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    if should_recompute(opts) {
        transition(&mut summary, RunState::Recompute);
        summary.recomputed = true;
        if let Err(e) = recompute(store, opts, cancel, &mut summary) {
            transition(&mut summary, RunState::Failed);
            return Err(e);
        }
    } else {
        transition(&mut summary, RunState::SkipToLoad);
        info!(
            "Snapshot {} already exists, skip computing hashes. Use --force to recalc.",
            opts.snapshot_path.display()
        );
    }

    match load_snapshot_cancellable(store, &opts.snapshot_path, cancel) {
        Ok(report) => {
            transition(&mut summary, RunState::Loaded);
            summary.staged_rows = report.staged_rows;
            summary.updated_rows = report.updated_rows;
        }
        Err(e) => {
            error!(
                "Load failed: {:#}. Snapshot kept at {}; rerun to retry without rehashing.",
                e,
                opts.snapshot_path.display()
            );
            summary.load_error = Some(format!("{:#}", e));
            transition(&mut summary, RunState::Failed);
        }
    }

    if summary.load_error.is_some() && cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
        bail!(
            "Load cancelled by user; catalog unchanged, snapshot kept at {}",
            opts.snapshot_path.display()
        );
    }

    if summary.load_error.is_none() {
        transition(&mut summary, RunState::Done);
    }
    log_summary(&summary);
    Ok(summary)
}

fn recompute<S: CatalogStore + ?Sized>(
    store: &mut S,
    opts: &Opts,
    cancel: Option<&Arc<AtomicBool>>,
    summary: &mut RunSummary,
) -> Result<()> {
    let records = store
        .pending_records()
        .context("query records without a digest")?;
    summary.found = records.len();
    info!("Found {} images without hash.", summary.found);

    let agg = collect_hashes(
        records,
        &opts.root_dir,
        opts.num_workers,
        opts.verbose,
        cancel,
    )?;
    summary.hashed = agg.hashed.len();
    summary.failed = agg.failures.len();
    report_hash_failures(&agg.failures, opts.verbose);
    if agg.total() < summary.found {
        // A partial snapshot would be reused by the next run and hide the records never pulled.
        bail!(
            "Hashing cancelled by user after {} of {} records; no snapshot written",
            agg.total(),
            summary.found
        );
    }

    let written = write_snapshot(&opts.snapshot_path, &agg.hashed)?;
    info!(
        "Snapshot written: {} ({} lines)",
        opts.snapshot_path.display(),
        written
    );
    Ok(())
}

fn log_summary(summary: &RunSummary) {
    if summary.recomputed {
        info!(
            "{} | {} | found {}",
            Colors::colorize(Colors::HASHED, &format!("Hashed: {}", summary.hashed)),
            Colors::colorize(Colors::FAILED, &format!("Unreadable: {}", summary.failed)),
            summary.found
        );
    }
    info!(
        "{} ({} staged)",
        Colors::colorize(
            Colors::LOADED,
            &format!("Updated: {}", summary.updated_rows)
        ),
        summary.staged_rows
    );
}
