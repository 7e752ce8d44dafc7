//! hashfill: concurrent SHA-256 backfill for catalog files with staged, resumable bulk loading.

pub mod backfill;
pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use backfill::{backfill, should_recompute};
pub use engine::db_ops::CatalogStore;

/// Result alias used by public hashfill API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
