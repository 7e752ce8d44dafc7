//! Worker cap from the process open-file limit (Unix).

/// Descriptors one hashing worker holds at a time: the file being read, plus one spare.
pub const FDS_PER_WORKER: usize = 2;

/// Descriptors kept back for the catalog session, the snapshot, and std streams.
const RESERVED_FDS: u64 = 32;

/// Soft `RLIMIT_NOFILE`, or `None` when unlimited or unavailable.
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    let mut rlim = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: getrlimit only writes into `rlim`.
    let rc = unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut rlim) };
    if rc != 0 || rlim.rlim_cur == libc::RLIM_INFINITY {
        return None;
    }
    u64::try_from(rlim.rlim_cur).ok()
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Workers that fit in the descriptor budget (at least 1). `None` means no cap applies.
pub fn max_workers_by_fd_limit() -> Option<usize> {
    let usable = max_open_fds()?.saturating_sub(RESERVED_FDS);
    let usable = usize::try_from(usable).unwrap_or(usize::MAX);
    Some((usable / FDS_PER_WORKER).max(1))
}

/// `requested`, lowered to the descriptor budget when the limit is tighter.
pub fn cap_workers(requested: usize) -> usize {
    match max_workers_by_fd_limit() {
        Some(cap) if cap < requested => {
            log::debug!("Open-file limit allows {} hashing workers (requested {})", cap, requested);
            cap
        }
        _ => requested,
    }
}
