//! Pipeline handles: what a started hashing pool gives back to its caller.

use crossbeam_channel::Receiver;
use std::thread::JoinHandle;

use crate::HashOutcome;

/// Tuning resolved for one hashing pool.
#[derive(Clone, Debug)]
pub struct PipelineTuning {
    /// Workers actually spawned (requested count, capped by FD budget and record count).
    pub num_workers: usize,
    /// Records queued.
    pub total: usize,
}

/// Handles returned by [`run_pipeline`](super::run_pipeline): receive outcomes, then join.
pub struct PipelineHandles {
    pub outcome_rx: Receiver<HashOutcome>,
    pub worker_handles: Vec<JoinHandle<()>>,
    pub tuning: PipelineTuning,
}
