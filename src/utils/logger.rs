//! Terminal logging. Lines from pool threads carry the thread name (`worker-2`,
//! `actor-call-2`) so interleaved per-record output can be traced back to its worker.

use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

const PKG: &str = env!("CARGO_PKG_NAME");

/// Render one log line. `thread` is shown only for named non-main threads.
pub fn format_line(level: Level, target: &str, thread: Option<&str>, msg: &str) -> String {
    let origin = match thread {
        Some(t) if t != "main" => format!("{} {}", PKG.cyan(), t.blue()),
        _ => PKG.cyan().to_string(),
    };
    match level {
        Level::Error => format!("[{} {} {}] {}", origin, "ERROR".red(), target.white(), msg),
        Level::Warn => format!("[{} {}] {}", origin, "WARN".yellow(), msg),
        Level::Info => format!("[{}] {}", origin, msg),
        Level::Debug | Level::Trace => format!("[{}] {}", origin, msg.dimmed()),
    }
}

/// Install the logger: this crate at info (debug when `verbose`), dependencies at warn.
/// `RUST_LOG` still applies on top. Safe to call more than once.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(PKG, level)
        .format(|buf, record| {
            let current = std::thread::current();
            let line = format_line(
                record.level(),
                record.target(),
                current.name(),
                &record.args().to_string(),
            );
            writeln!(buf, "{}", line)
        })
        .try_init();
}
