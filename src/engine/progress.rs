//! Hashing progress bar, shown in verbose runs only.

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

/// Shared bar; the aggregator is the only writer.
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Bar over `total` files, or `None` when not verbose or there is nothing to hash.
pub fn hashing_bar(verbose: bool, total: usize) -> Option<ProgressBar> {
    if !verbose || total == 0 {
        return None;
    }
    let bar = kdam::tqdm!(
        total = total,
        desc = "Hashing",
        animation = Animation::Classic,
        unit = " files"
    );
    Some(Arc::new(Mutex::new(bar)))
}

/// Advance by `n` files. Blocks on the lock so no count is lost; a poisoned bar is skipped.
pub fn advance_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut bar) = pb.lock() {
        let _ = bar.update(n);
    }
}

/// Final redraw, then a newline so following log lines start clean.
pub fn finish_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.lock() {
        let _ = bar.refresh();
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_bar_when_quiet_or_empty() {
        assert!(hashing_bar(false, 10).is_none());
        assert!(hashing_bar(true, 0).is_none());
    }

    #[test]
    fn every_advance_is_counted() {
        let pb = hashing_bar(true, 10).unwrap();
        for _ in 0..3 {
            advance_bar(&pb, 2);
        }
        advance_bar(&pb, 1);
        assert_eq!(pb.lock().unwrap().counter, 7);
    }
}
