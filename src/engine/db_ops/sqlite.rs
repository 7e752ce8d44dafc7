//! SQLite catalog: temp staging table, single-transaction streamed ingestion, `UPDATE ... FROM`.

use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::{APPLY_STAGED_SQL, CatalogStore, DROP_STAGING_SQL};
use crate::Record;

/// WAL tuning pragmas. Use after PRAGMA journal_mode = WAL.
const WAL_PRAGMAS: &str = r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA journal_size_limit = 67108864;
        "#;

/// Catalog tables, created only when absent. No indexes: an existing catalog's schema is left as is.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS datasets (
    id TEXT PRIMARY KEY,
    dir_path TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS images (
    id TEXT PRIMARY KEY,
    dataset_id TEXT NOT NULL REFERENCES datasets(id),
    file_path TEXT NOT NULL,
    file_hash CHAR(64)
);
"#;

const PENDING_RECORDS_SQL: &str = "SELECT i.id, i.file_path, d.dir_path \
     FROM images i \
     JOIN datasets d ON i.dataset_id = d.id \
     WHERE i.file_hash IS NULL";

const CREATE_STAGING_SQL: &str = r#"
CREATE TEMP TABLE tmp_hashes (
    id TEXT PRIMARY KEY,
    file_hash TEXT NOT NULL
        CHECK (length(file_hash) = 64 AND file_hash NOT GLOB '*[^0-9a-f]*')
);
"#;

const INSERT_STAGED_SQL: &str = "INSERT INTO tmp_hashes (id, file_hash) VALUES (?1, ?2)";

/// Split one `key,digest_hex` ingestion line. Mirrors CSV COPY: exactly two non-empty fields.
fn split_staged_line(line: &str) -> Result<(&str, &str)> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let Some((key, digest_hex)) = line.split_once(',') else {
        bail!("missing data for column \"file_hash\"");
    };
    if digest_hex.contains(',') {
        bail!("extra data after last expected column");
    }
    if key.is_empty() {
        bail!("empty key");
    }
    Ok((key, digest_hex))
}

pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Underlying connection (fixtures and inspection).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Open an existing SQLite catalog. A missing file is a connection error.
///
/// Side effects on the file: the journal mode is switched to WAL (persistent), and the two catalog
/// tables are created if they do not exist yet. Existing tables and indexes are not altered.
pub fn open_catalog(path: &Path) -> Result<SqliteCatalog> {
    if !path.is_file() {
        bail!("catalog database not found: {}", path.display());
    }
    let conn = Connection::open(path).context("open catalog database")?;
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .context("enable WAL")?;
    conn.execute_batch(WAL_PRAGMAS).context("set WAL pragmas")?;
    conn.execute_batch(SCHEMA).context("create schema")?;
    Ok(SqliteCatalog { conn })
}

/// Open an in-memory catalog with the same schema (no WAL pragmas needed).
pub fn open_catalog_in_memory() -> Result<SqliteCatalog> {
    let conn = Connection::open_in_memory().context("open in-memory catalog")?;
    conn.execute_batch(SCHEMA).context("create schema")?;
    Ok(SqliteCatalog { conn })
}

impl CatalogStore for SqliteCatalog {
    fn pending_records(&mut self) -> Result<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(PENDING_RECORDS_SQL)
            .context("prepare pending-record query")?;
        let rows = stmt.query_map([], |row| {
            Ok(Record {
                key: row.get(0)?,
                relative_path: row.get(1)?,
                dataset_dir: row.get(2)?,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row.context("read pending record")?);
        }
        Ok(records)
    }

    fn create_staging_table(&mut self) -> Result<()> {
        self.conn
            .execute_batch(CREATE_STAGING_SQL)
            .context("create staging table")
    }

    fn copy_into_staging(&mut self, snapshot: &mut dyn Read) -> Result<u64> {
        let tx = self.conn.transaction().context("begin staging transaction")?;
        let mut staged = 0_u64;
        {
            let mut stmt = tx.prepare(INSERT_STAGED_SQL).context("prepare staging insert")?;
            let reader = BufReader::new(snapshot);
            for (idx, line) in reader.lines().enumerate() {
                let line_no = idx + 1;
                let line = line.with_context(|| format!("read snapshot line {line_no}"))?;
                let (key, digest_hex) =
                    split_staged_line(&line).with_context(|| format!("snapshot line {line_no}"))?;
                stmt.execute((key, digest_hex))
                    .with_context(|| format!("stage snapshot line {line_no} (key {key})"))?;
                staged += 1;
            }
        }
        // Dropping `tx` on any error above rolls the whole ingestion back.
        tx.commit().context("commit staging transaction")?;
        Ok(staged)
    }

    fn apply_staged_digests(&mut self) -> Result<u64> {
        let n = self
            .conn
            .execute(APPLY_STAGED_SQL, [])
            .context("apply staged digests")?;
        Ok(n as u64)
    }

    fn drop_staging_table(&mut self) -> Result<()> {
        self.conn
            .execute_batch(DROP_STAGING_SQL)
            .context("drop staging table")
    }
}
