use colored::{ColoredString, Colorize};
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

const PKG: &str = env!("CARGO_PKG_NAME");

/// Install the logger: this crate at Info (Debug when verbose), dependencies at Warn. `RUST_LOG`
/// still applies. A second call is a no-op.
pub fn setup_logging(verbose: bool) {
    let own_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(PKG, own_level)
        .format(|buf, record| match level_tag(record.level()) {
            Some(tag) => writeln!(
                buf,
                "[{} {} {}] {}",
                PKG.cyan(),
                tag,
                record.target().white(),
                record.args()
            ),
            None => writeln!(buf, "[{}] {}", PKG.cyan(), record.args()),
        })
        .try_init();
}

fn level_tag(level: Level) -> Option<ColoredString> {
    match level {
        Level::Error => Some("ERROR".red().bold()),
        Level::Warn => Some("WARN".yellow()),
        _ => None,
    }
}

/// Terminal colors for summary lines.
pub struct Colors;

impl Colors {
    pub const HASHED: &'static str = "green";
    pub const FAILED: &'static str = "red";
    pub const LOADED: &'static str = "cyan";

    pub fn colorize(color: &str, text: &str) -> String {
        match color {
            Self::HASHED => text.green().to_string(),
            Self::FAILED => text.red().to_string(),
            Self::LOADED => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
