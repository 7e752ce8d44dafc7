//! Catalog store: pending-record query, staging table, bulk ingestion, set-based update.

mod sqlite;
#[cfg(feature = "postgres")]
mod pg;

use anyhow::Result;
use std::io::Read;

use crate::Record;

pub use sqlite::{SqliteCatalog, open_catalog, open_catalog_in_memory};
#[cfg(feature = "postgres")]
pub use pg::{PgConnectParams, PostgresCatalog};

/// The data store as the core sees it. Owned by the orchestrator and loader; workers never see it.
pub trait CatalogStore {
    /// Every catalog record whose digest column is unset.
    fn pending_records(&mut self) -> Result<Vec<Record>>;

    /// Create the session-scoped staging table (`key` primary key, `digest_hex` text).
    fn create_staging_table(&mut self) -> Result<()>;

    /// Stream `key,digest_hex\n` lines into the staging table through the store's bulk channel.
    /// All-or-nothing: on error no staged rows survive. Returns rows staged.
    fn copy_into_staging(&mut self, snapshot: &mut dyn Read) -> Result<u64>;

    /// One set-based statement copying staged digests into the catalog for every matching key.
    /// Returns catalog rows updated.
    fn apply_staged_digests(&mut self) -> Result<u64>;

    /// Drop the staging table if it exists.
    fn drop_staging_table(&mut self) -> Result<()>;
}

impl<S: CatalogStore + ?Sized> CatalogStore for Box<S> {
    fn pending_records(&mut self) -> Result<Vec<Record>> {
        (**self).pending_records()
    }

    fn create_staging_table(&mut self) -> Result<()> {
        (**self).create_staging_table()
    }

    fn copy_into_staging(&mut self, snapshot: &mut dyn Read) -> Result<u64> {
        (**self).copy_into_staging(snapshot)
    }

    fn apply_staged_digests(&mut self) -> Result<u64> {
        (**self).apply_staged_digests()
    }

    fn drop_staging_table(&mut self) -> Result<()> {
        (**self).drop_staging_table()
    }
}

/// Set-based update from the staging table. Unconditional on the current digest.
pub(crate) const APPLY_STAGED_SQL: &str = "UPDATE images \
     SET file_hash = t.file_hash \
     FROM tmp_hashes t \
     WHERE images.id = t.id";

pub(crate) const DROP_STAGING_SQL: &str = "DROP TABLE IF EXISTS tmp_hashes";
