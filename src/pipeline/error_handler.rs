use crate::HashFailure;

/// Summarize per-record failures after the pool has joined. Each failure was already logged by
/// its worker; verbose mode lists them again in one block.
pub fn report_hash_failures(failures: &[HashFailure], verbose: bool) {
    if failures.is_empty() {
        return;
    }
    log::warn!(
        "{} files could not be read; their digests stay unset until a later run",
        failures.len()
    );
    if verbose {
        for f in failures {
            eprintln!("  unreadable: {} [{}] ({})", f.path.display(), f.key, f.reason);
        }
    }
}
