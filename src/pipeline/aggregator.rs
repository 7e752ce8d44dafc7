//! Result aggregator: drains worker outcomes into the hashed set and the failure list.

use crossbeam_channel::Receiver;
use kdam::Bar;
use std::sync::{Arc, Mutex};

use crate::engine::progress::advance_bar;
use crate::utils::config::ProgressConsts;
use crate::{HashFailure, HashOutcome, HashedRecord};

/// Everything the workers reported, in arrival order (which is not meaningful).
#[derive(Debug, Default)]
pub struct Aggregated {
    pub hashed: Vec<HashedRecord>,
    pub failures: Vec<HashFailure>,
}

impl Aggregated {
    /// Records accounted for (hashed + failed).
    pub fn total(&self) -> usize {
        self.hashed.len() + self.failures.len()
    }

    fn push(&mut self, outcome: HashOutcome) {
        match outcome {
            HashOutcome::Hashed(record) => self.hashed.push(record),
            HashOutcome::Failed(failure) => self.failures.push(failure),
        }
    }
}

/// Receive outcomes until every worker has dropped its sender.
pub fn collect_outcomes(
    outcome_rx: Receiver<HashOutcome>,
    progress: Option<&Arc<Mutex<Bar>>>,
) -> Aggregated {
    let mut agg = Aggregated::default();
    let batch = ProgressConsts::PROGRESS_UPDATE_BATCH_SIZE;
    while let Ok(outcome) = outcome_rx.recv() {
        agg.push(outcome);
        if let Some(pb) = progress
            && agg.total().is_multiple_of(batch)
        {
            advance_bar(pb, batch);
        }
    }
    if let Some(pb) = progress {
        let remainder = agg.total() % batch;
        if remainder > 0 {
            advance_bar(pb, remainder);
        }
    }
    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn splits_hashed_and_failed() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(HashOutcome::Hashed(HashedRecord {
            key: "a".into(),
            digest: [0; 32],
        }))
        .unwrap();
        tx.send(HashOutcome::Failed(HashFailure {
            key: "b".into(),
            path: PathBuf::from("/data/ds/b.jpg"),
            reason: "No such file or directory".into(),
        }))
        .unwrap();
        drop(tx);
        let agg = collect_outcomes(rx, None);
        assert_eq!(agg.hashed.len(), 1);
        assert_eq!(agg.failures.len(), 1);
        assert_eq!(agg.total(), 2);
        assert_eq!(agg.failures[0].key, "b");
    }
}
