pub mod config;
pub mod fd_limit;
pub mod hashfill_toml;
pub mod logger;
pub mod password;
pub mod tempfiles;

pub use config::*;
pub use fd_limit::{FDS_PER_WORKER, cap_workers, max_open_fds, max_workers_by_fd_limit};
pub use logger::{Colors, setup_logging};
pub use password::get_password;
pub use tempfiles::{remove_stale_temp, rename_temp_to_final, temp_path_for};
