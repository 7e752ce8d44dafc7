//! CLI command handler: layer config, connect, run the backfill.

use anyhow::{Context, Result, bail};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::Opts;
use crate::backfill::backfill;
use crate::engine::arg_parser::Cli;
use crate::engine::db_ops::{CatalogStore, open_catalog};
use crate::engine::tools::check_root_dir;
use crate::utils::config::RunDefaults;
use crate::utils::hashfill_toml::{HashfillToml, layered, load_hashfill_toml};
use crate::utils::setup_logging;

/// Where the catalog lives.
#[derive(Clone, Debug)]
pub enum Backend {
    Sqlite(PathBuf),
    Postgres {
        host: String,
        port: u16,
        dbname: String,
        user: String,
        /// `None` → resolve from env / .env / prompt at connect time.
        password: Option<String>,
    },
}

/// Merge CLI flags over file config over defaults. Fails when the root directory is missing.
pub fn resolve_config(cli: &Cli, file: &HashfillToml) -> Result<(Opts, Backend)> {
    let settings = &file.settings;
    let db = &file.database;

    let Some(root_dir) = cli
        .root_dir
        .clone()
        .or_else(|| settings.root_dir.as_ref().map(PathBuf::from))
    else {
        bail!("Root directory is required (-r).");
    };
    let num_workers = layered!(cli.threads, settings.threads, RunDefaults::NUM_WORKERS);
    if num_workers == 0 {
        bail!("Worker count must be at least 1.");
    }
    let opts = Opts {
        root_dir,
        snapshot_path: layered!(
            cli.csv_path.clone(),
            settings.csv_path.as_ref().map(PathBuf::from),
            PathBuf::from(RunDefaults::SNAPSHOT_PATH)
        ),
        num_workers,
        force: cli.force,
        verbose: layered!(cli.verbose, settings.verbose, false),
    };

    let backend = match cli
        .sqlite
        .clone()
        .or_else(|| db.sqlite.as_ref().map(PathBuf::from))
    {
        Some(path) => Backend::Sqlite(path),
        None => Backend::Postgres {
            host: layered!(cli.host.clone(), db.host.clone(), RunDefaults::HOST.into()),
            port: layered!(cli.port, db.port, RunDefaults::PORT),
            dbname: layered!(cli.dbname.clone(), db.dbname.clone(), RunDefaults::DBNAME.into()),
            user: layered!(cli.user.clone(), db.user.clone(), RunDefaults::USER.into()),
            password: cli.password.clone().or_else(|| db.password.clone()),
        },
    };
    Ok((opts, backend))
}

/// Establish the data-store session. Any failure here is fatal for the run.
pub fn connect(backend: &Backend, cwd: &Path) -> Result<Box<dyn CatalogStore>> {
    match backend {
        Backend::Sqlite(path) => {
            debug!("Opening SQLite catalog {}", path.display());
            Ok(Box::new(open_catalog(path)?))
        }
        #[cfg(feature = "postgres")]
        Backend::Postgres {
            host,
            port,
            dbname,
            user,
            password,
        } => {
            use crate::engine::db_ops::{PgConnectParams, PostgresCatalog};
            let password = match password {
                Some(p) => p.clone(),
                None => crate::utils::get_password(cwd, user)?,
            };
            let params = PgConnectParams {
                host: host.clone(),
                port: *port,
                dbname: dbname.clone(),
                user: user.clone(),
                password,
            };
            Ok(Box::new(PostgresCatalog::connect(&params)?))
        }
        #[cfg(not(feature = "postgres"))]
        Backend::Postgres { .. } => {
            let _ = cwd;
            bail!("Built without PostgreSQL support; use --sqlite PATH.")
        }
    }
}

/// Parse config, connect, run. Per-file hashing failures and a failed load phase still return
/// `Ok`; missing configuration, connection failure, and cancellation return `Err`.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("current directory")?;
    let file = load_hashfill_toml(cli.config.as_deref(), &cwd)?.unwrap_or_default();
    let (mut opts, backend) = resolve_config(cli, &file)?;
    setup_logging(opts.verbose);
    opts.root_dir = check_root_dir(&opts.root_dir)?;
    debug!("{} CONFIG: {:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);

    let mut store = connect(&backend, &cwd)?;

    let cancel_requested = Arc::new(AtomicBool::new(false));
    let cancel_requested_handler = Arc::clone(&cancel_requested);
    ctrlc::set_handler(move || {
        cancel_requested_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    let summary = backfill(&mut store, &opts, Some(&cancel_requested))?;
    drop(store);
    if summary.load_error.is_none() {
        log::info!("All done!");
    } else {
        debug!("Final state: {}", summary.state);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("hashfill").chain(args.iter().copied()))
    }

    #[test]
    fn root_dir_is_required() {
        let err = resolve_config(&cli(&[]), &HashfillToml::default()).unwrap_err();
        assert!(err.to_string().contains("-r"));
    }

    #[test]
    fn defaults_apply() {
        let (opts, backend) = resolve_config(&cli(&["-r", "/data"]), &HashfillToml::default()).unwrap();
        assert_eq!(opts.snapshot_path, PathBuf::from(RunDefaults::SNAPSHOT_PATH));
        assert_eq!(opts.num_workers, RunDefaults::NUM_WORKERS);
        assert!(!opts.force);
        assert!(!opts.verbose);
        match backend {
            Backend::Postgres { host, port, .. } => {
                assert_eq!(host, RunDefaults::HOST);
                assert_eq!(port, RunDefaults::PORT);
            }
            Backend::Sqlite(_) => panic!("expected server backend"),
        }
    }

    #[test]
    fn cli_overrides_file() {
        let file: HashfillToml = toml::from_str(
            r#"
            [settings]
            root_dir = "/from-file"
            threads = 2

            [database]
            sqlite = "/tmp/catalog.db"
            "#,
        )
        .unwrap();
        let (opts, backend) = resolve_config(&cli(&["-t", "6", "-f"]), &file).unwrap();
        assert_eq!(opts.root_dir, PathBuf::from("/from-file"));
        assert_eq!(opts.num_workers, 6);
        assert!(opts.force);
        assert!(matches!(backend, Backend::Sqlite(p) if p == Path::new("/tmp/catalog.db")));
    }

    #[test]
    fn zero_workers_rejected() {
        assert!(resolve_config(&cli(&["-r", "/data", "-t", "0"]), &HashfillToml::default()).is_err());
    }
}
