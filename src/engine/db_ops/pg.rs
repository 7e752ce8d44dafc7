//! PostgreSQL catalog: `CREATE TEMP TABLE`, `COPY ... FROM STDIN`, `UPDATE ... FROM`.

use anyhow::{Context, Result};
use postgres::{Client, NoTls};
use std::io::Read;

use super::{APPLY_STAGED_SQL, CatalogStore, DROP_STAGING_SQL};
use crate::Record;

const PENDING_RECORDS_SQL: &str = "SELECT i.id::text, i.file_path, d.dir_path \
     FROM images i \
     JOIN datasets d ON i.dataset_id = d.id \
     WHERE i.file_hash IS NULL";

const CREATE_STAGING_SQL: &str = "CREATE TEMP TABLE tmp_hashes (\
     id UUID PRIMARY KEY, \
     file_hash CHAR(64) NOT NULL CHECK (file_hash ~ '^[0-9a-f]{64}$'))";

const COPY_STAGING_SQL: &str = "COPY tmp_hashes (id, file_hash) FROM STDIN WITH (FORMAT csv)";

/// Connection settings for a PostgreSQL catalog.
#[derive(Clone, Debug)]
pub struct PgConnectParams {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

pub struct PostgresCatalog {
    client: Client,
}

impl PostgresCatalog {
    /// Open a session. Failure here is fatal for the run.
    pub fn connect(params: &PgConnectParams) -> Result<Self> {
        let client = postgres::Config::new()
            .host(&params.host)
            .port(params.port)
            .dbname(&params.dbname)
            .user(&params.user)
            .password(&params.password)
            .connect(NoTls)
            .with_context(|| {
                format!(
                    "connect to postgres {}@{}:{}/{}",
                    params.user, params.host, params.port, params.dbname
                )
            })?;
        Ok(Self { client })
    }
}

impl CatalogStore for PostgresCatalog {
    fn pending_records(&mut self) -> Result<Vec<Record>> {
        let rows = self
            .client
            .query(PENDING_RECORDS_SQL, &[])
            .context("query pending records")?;
        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(Record {
                key: row.try_get(0).context("read record id")?,
                relative_path: row.try_get(1).context("read record file_path")?,
                dataset_dir: row.try_get(2).context("read record dir_path")?,
            });
        }
        Ok(records)
    }

    fn create_staging_table(&mut self) -> Result<()> {
        self.client
            .batch_execute(CREATE_STAGING_SQL)
            .context("create staging table")
    }

    fn copy_into_staging(&mut self, snapshot: &mut dyn Read) -> Result<u64> {
        let mut writer = self
            .client
            .copy_in(COPY_STAGING_SQL)
            .context("start COPY FROM STDIN")?;
        // An error before finish() drops the writer, which aborts the COPY server-side.
        std::io::copy(snapshot, &mut writer).context("stream snapshot into staging table")?;
        let staged = writer.finish().context("finish COPY into staging table")?;
        Ok(staged)
    }

    fn apply_staged_digests(&mut self) -> Result<u64> {
        self.client
            .execute(APPLY_STAGED_SQL, &[])
            .context("apply staged digests")
    }

    fn drop_staging_table(&mut self) -> Result<()> {
        self.client
            .batch_execute(DROP_STAGING_SQL)
            .context("drop staging table")
    }
}
