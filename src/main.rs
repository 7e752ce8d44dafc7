//! hashfill CLI: hash catalog files missing a digest, stage to CSV, bulk-load.

use anyhow::Result;
use clap::Parser;
use hashfill::engine::arg_parser::Cli;
use hashfill::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
