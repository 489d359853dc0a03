//! # Logging
//!
//! Two outputs from one `tracing` subscriber:
//!
//! | Output | Format | Level |
//! |--------|--------|-------|
//! | stderr | compact, human readable | `warn` (`info` with `--verbose`) |
//! | `<root>/logs/chameleon.jsonl` | one JSON object per line | `RUST_LOG`, default `info` |
//!
//! The file writer is non-blocking; keep the returned [`LoggingGuard`] alive
//! until exit so buffered lines are flushed.

use std::fs::{self, OpenOptions};
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// File name of the JSON log inside the log directory.
pub const LOG_FILE: &str = "chameleon.jsonl";

/// Flushes the file log when dropped.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber. A log file that cannot be opened is
/// reported on stderr and skipped; logging never stops the program.
pub fn init(log_dir: &Path, verbose: bool) -> LoggingGuard {
    let log_path = log_dir.join(LOG_FILE);
    let file = fs::create_dir_all(log_dir)
        .and_then(|()| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
        })
        .map_err(|e| eprintln!("warning: file logging disabled ({}): {e}", log_path.display()))
        .ok();

    let (json_layer, file_guard) = match file {
        Some(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_span_events(FmtSpan::NONE);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    let stderr_level = if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(stderr_level);

    // Only fails if a subscriber is already installed (e.g. in tests).
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(stderr_layer)
        .try_init();

    tracing::debug!(log_path = %log_path.display(), "Logging initialized");

    LoggingGuard {
        _file_guard: file_guard,
    }
}
