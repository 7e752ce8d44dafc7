//! Engine module: hashing, snapshot I/O, catalog store, bulk loader, CLI.

pub mod arg_parser;
pub mod cli;
pub mod db_ops;
pub mod hashing;
pub mod loader;
pub mod progress;
pub mod snapshot;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use db_ops::{CatalogStore, SqliteCatalog, open_catalog, open_catalog_in_memory};
pub use hashing::{digest_file, digest_to_hex};
pub use loader::{LoadReport, load_snapshot, load_snapshot_cancellable};
pub use snapshot::{open_snapshot, snapshot_line, snapshot_ready, write_snapshot};
pub use tools::check_root_dir;
