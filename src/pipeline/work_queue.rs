//! Work queue: pending records handed out to workers exactly once.

use crossbeam_channel::{Receiver, unbounded};

use crate::Record;

/// Pending records behind a closed channel. Every clone pulls from the same queue; each record is
/// returned by exactly one [`pop`](WorkQueue::pop) across all clones.
#[derive(Clone)]
pub struct WorkQueue {
    rx: Receiver<Record>,
}

impl WorkQueue {
    /// Fill the queue with every record. No producer stays behind, so an empty queue stays empty.
    pub fn new(records: Vec<Record>) -> Self {
        let (tx, rx) = unbounded();
        for record in records {
            // Receiver is alive in this scope; send cannot fail.
            let _ = tx.send(record);
        }
        drop(tx);
        Self { rx }
    }

    /// Remove and return one record, or `None` once the queue is drained.
    pub fn pop(&self) -> Option<Record> {
        self.rx.try_recv().ok()
    }

    /// Records not yet handed out.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::thread;

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new(format!("k{i}"), format!("{i}.jpg"), "ds"))
            .collect()
    }

    #[test]
    fn pops_every_record_then_empty() {
        let q = WorkQueue::new(records(3));
        assert_eq!(q.len(), 3);
        let mut keys: Vec<String> = std::iter::from_fn(|| q.pop()).map(|r| r.key).collect();
        keys.sort();
        assert_eq!(keys, vec!["k0", "k1", "k2"]);
        assert!(q.is_empty());
        assert!(q.pop().is_none());
    }

    #[test]
    fn empty_queue() {
        let q = WorkQueue::new(Vec::new());
        assert!(q.is_empty());
        assert!(q.pop().is_none());
    }

    #[test]
    fn concurrent_pullers_see_each_record_once() {
        let q = WorkQueue::new(records(1000));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let q = q.clone();
                let seen = Arc::clone(&seen);
                thread::spawn(move || {
                    while let Some(r) = q.pop() {
                        seen.lock().unwrap().push(r.key);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1000);
        let unique: HashSet<_> = seen.iter().collect();
        assert_eq!(unique.len(), 1000);
    }
}
