use clap::Parser;
use std::path::PathBuf;

/// Backfill SHA-256 digests for catalog files and bulk-load them.
#[derive(Clone, Debug, Parser)]
#[command(name = "hashfill")]
#[command(
    about = "Hash every catalog file without a digest, stage results to a CSV snapshot, and bulk-load them."
)]
pub struct Cli {
    /// Root directory; files resolve to ROOT/<dataset dir>/<file path>. Required.
    #[arg(long, short = 'r')]
    pub root_dir: Option<PathBuf>,

    /// Database host. Default: localhost.
    #[arg(long, short = 'H')]
    pub host: Option<String>,

    /// Database port. Default: 5432.
    #[arg(long, short = 'P')]
    pub port: Option<u16>,

    /// Database name.
    #[arg(long, short = 'd')]
    pub dbname: Option<String>,

    /// Database user.
    #[arg(long, short = 'u')]
    pub user: Option<String>,

    /// Database password. Falls back to HASHFILL_DB_PASSWORD, then .env, then a prompt.
    #[arg(long, short = 'p')]
    pub password: Option<String>,

    /// Use a SQLite catalog file instead of a database server.
    #[arg(long, value_name = "PATH")]
    pub sqlite: Option<PathBuf>,

    /// Staging snapshot path. Default: /tmp/image_hashes.csv.
    #[arg(long, short = 'c')]
    pub csv_path: Option<PathBuf>,

    /// Hashing worker threads. Default: 8.
    #[arg(long, short = 't', value_parser = clap::value_parser!(usize))]
    pub threads: Option<usize>,

    /// Recompute digests even if the snapshot already exists.
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Verbose output (progress bar, per-file failure list).
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Config file. Default: hashfill.toml in the current directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
