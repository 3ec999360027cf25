//! Tracing subscriber setup.
//!
//! Console records go to stderr at INFO (DEBUG with `--debug`), coloured only
//! when stderr is a terminal. `RUST_LOG` overrides the console filter. With
//! `--log-file` a second, uncoloured layer writes DEBUG records to a daily
//! rolling file next to that path (`<name>.YYYY-MM-DD`), keeping the last
//! seven files.

use std::io;
use std::path::Path;

use console::Term;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Number of daily log files kept before the oldest is removed.
const MAX_LOG_FILES: usize = 7;

/// Filter directives for our own crates at the given level.
fn directives(level: &str) -> String {
    format!("branchsync={level},branchsync_cli={level}")
}

fn console_filter(debug: bool) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(directives(if debug { "debug" } else { "info" })),
    }
}

/// Daily rolling appender for `path`: files are created in its parent
/// directory, named after its file name plus the date.
fn file_appender(path: &Path) -> io::Result<RollingFileAppender> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a file path", path.display()),
        )
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name.to_string_lossy())
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .map_err(io::Error::other)
}

/// Install the global subscriber.
///
/// The returned guard flushes the log file when dropped and must be kept
/// alive until the process exits.
pub fn init(debug: bool, log_file: Option<&Path>) -> io::Result<Option<WorkerGuard>> {
    let console = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(Term::stderr().is_term())
        .with_target(false)
        .with_filter(console_filter(debug));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let appender = file_appender(path)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(directives("debug")));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();

    Ok(guard)
}
