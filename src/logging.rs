//! Logging for applications built on this crate.
//!
//! [`Logger`] appends timestamped lines to a log file and optionally echoes them to the console.
//! It is an ordinary value: construct it once with its sinks and hand references to whoever needs
//! to log. [`init_tracing`] routes the crate's own `tracing` diagnostics to the same sinks.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::Context;
use chrono::Local;
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

const TIMESTAMP_FORMAT: &str = "%d.%m. %H:%M:%S%.3f";

/// Sinks and verbosity for logging.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Echo messages to standard output.
    pub console: bool,
    /// Append messages to this file.
    pub file_path: Option<PathBuf>,
    /// Minimum level for `tracing` diagnostics.
    pub level: Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console: true,
            file_path: None,
            level: Level::INFO,
        }
    }
}

/// Timestamped line logger. Writes from several threads are serialized; sink failures are
/// ignored so that logging never fails the caller.
#[derive(Debug)]
pub struct Logger {
    config: LogConfig,
    lock: Mutex<()>,
}

impl Logger {
    #[must_use]
    pub fn new(config: LogConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn log(&self, message: &str) {
        self.write(message, self.config.file_path.as_deref(), self.config.console);
    }

    /// Log into `file_name` next to the configured log file instead of the log file itself.
    /// Does not write any file when no log file is configured.
    pub fn log_to(&self, file_name: &str, message: &str) {
        let sibling = self
            .config
            .file_path
            .as_deref()
            .map(|path| crate::path::directory_of(path).join(file_name));

        self.write(message, sibling.as_deref(), self.config.console);
    }

    /// Log to the console and the log file even when console output is disabled.
    pub fn force_log(&self, message: &str) {
        self.write(message, self.config.file_path.as_deref(), true);
    }

    fn write(&self, message: &str, file: Option<&Path>, console: bool) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        if console {
            println!("{message}");
        }

        if let Some(path) = file {
            _ = append_line(path, message);
        }
    }
}

fn append_line(path: &Path, message: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let timestamp = Local::now().format(TIMESTAMP_FORMAT);

    writeln!(file, "{timestamp}    {message}")
}

/// Install a global `tracing` subscriber for `config`: the log file when one is set, otherwise
/// standard error when console output is enabled. `RUST_LOG` overrides the level. Calling this
/// again after a subscriber is installed is harmless.
pub fn init_tracing(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match (&config.file_path, config.console) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;

            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        (None, true) => builder.with_writer(io::stderr).try_init(),
        (None, false) => return Ok(()),
    };

    if let Err(e) = result {
        debug!("tracing subscriber already installed: {e}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn file_logger(dir: &Path, console: bool) -> Logger {
        Logger::new(LogConfig {
            console,
            file_path: Some(dir.join("client.log")),
            level: Level::DEBUG,
        })
    }

    #[test]
    fn appends_timestamped_lines() {
        let dir = tempfile::tempdir().expect("failed to create temporary directory");
        let logger = file_logger(dir.path(), false);

        logger.log("first");
        logger.force_log("second");

        let contents =
            fs::read_to_string(dir.path().join("client.log")).expect("failed to read log file");
        let lines = contents.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 2);
        assert_eq!(&lines[0][19..], "    first");
        assert_eq!(&lines[1][19..], "    second");
        assert_eq!(&lines[0][2..3], ".");
        assert_eq!(&lines[0][5..7], ". ");
    }

    #[test]
    fn log_to_sibling_file() {
        let dir = tempfile::tempdir().expect("failed to create temporary directory");
        let logger = file_logger(dir.path(), false);

        logger.log_to("updater.log", "checking");

        let contents =
            fs::read_to_string(dir.path().join("updater.log")).expect("failed to read log file");
        assert!(contents.ends_with("    checking\n"));
        assert!(!dir.path().join("client.log").exists());
    }

    #[test]
    fn unwritable_sink_is_ignored() {
        let dir = tempfile::tempdir().expect("failed to create temporary directory");
        let logger = Logger::new(LogConfig {
            console: false,
            file_path: Some(dir.path().join("missing").join("client.log")),
            ..LogConfig::default()
        });

        logger.log("dropped");

        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn console_only_logger_writes_no_file() {
        let logger = Logger::new(LogConfig::default());

        logger.log("hello");
        logger.log_to("other.log", "hello");

        assert!(logger.config().console);
        assert!(logger.config().file_path.is_none());
    }
}
