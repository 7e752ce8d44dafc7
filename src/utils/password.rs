//! Database password loading: env var → .env in dir → secure prompt.

use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;
use std::path::Path;

use crate::utils::config::PackagePaths;

fn non_empty_env(key: &str) -> Option<String> {
    let s = std::env::var(key).ok()?;
    let s = s.trim().to_string();
    (!s.is_empty()).then_some(s)
}

fn try_env_then_dotenv(dir: &Path) -> Option<String> {
    let key = PackagePaths::get().password_env_key();
    if let Some(s) = non_empty_env(key) {
        return Some(s);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        return non_empty_env(key);
    }
    None
}

/// Read the database password: env (`HASHFILL_DB_PASSWORD`) → .env in `dir` → secure prompt.
pub fn get_password(dir: &Path, user: &str) -> Result<String> {
    if let Some(s) = try_env_then_dotenv(dir) {
        debug!("Database password found in environment");
        return Ok(s);
    }
    let label = format!("[{}]", env!("CARGO_PKG_NAME")).cyan().bold();
    let pass = rpassword::prompt_password(format!("{} Password for {}: ", label, user))
        .context("read database password")?;
    Ok(pass.trim().to_string())
}
