//! Tracing subscriber setup.
//!
//! The terminal belongs to the UI while it runs, so logs go to a file when
//! one is named (`--log-file` or `FOLIO_LOG_PATH`) and to stderr otherwise.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use tracing::Level;
use tracing_subscriber::filter::EnvFilter;

/// Environment variable naming a log file.
pub const LOG_PATH_ENV: &str = "FOLIO_LOG_PATH";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise files get `info` and stderr gets
/// `warn`, since stderr shares the screen with the UI; `verbose` raises
/// both to `debug`. A log file that can't be opened falls back to stderr.
pub fn init(log_file: Option<&Path>, verbose: bool) {
    let path = log_file
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(LOG_PATH_ENV).map(Into::into));

    let mut unopened = None;
    if let Some(path) = path {
        match open_log_file(&path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter(verbose, Level::INFO))
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(file)
                    .try_init();
                return;
            }
            Err(err) => unopened = Some((path, err)),
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose, Level::WARN))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();

    if let Some((path, err)) = unopened {
        tracing::warn!(path = %path.display(), %err, "cannot open log file, logging to stderr");
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn filter(verbose: bool, quiet_level: Level) -> EnvFilter {
    let default_level = if verbose { Level::DEBUG } else { quiet_level };
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}
