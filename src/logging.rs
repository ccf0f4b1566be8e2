//! Tracing subscriber setup
//!
//! The interactive view owns the terminal, so it logs to a file (by default
//! `contactdir.log` next to the executable, truncated on every run). One-shot
//! commands log to stderr.
//!
//! Filter priority: `CONTACTDIR_LOG`, then `RUST_LOG`, then the CLI verbosity.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CONTACTDIR_LOG";

/// Verbosity level derived from CLI flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    pub fn default_level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Where log lines go
#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Default log file path (same directory as the executable)
pub fn default_log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("contactdir.log")
}

/// Install the global subscriber. Later calls are ignored.
///
/// When the log file cannot be opened, logging is disabled rather than
/// spilled onto the terminal UI.
pub fn init(target: LogTarget, verbosity: Verbosity) {
    let filter = build_env_filter(verbosity);

    let result = match target {
        LogTarget::Stderr => {
            let use_ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(use_ansi)
                        .without_time()
                        .compact(),
                )
                .try_init()
        }
        LogTarget::File(path) => {
            let file = match OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
            {
                Ok(file) => file,
                Err(_) => return,
            };
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true)
                        .with_thread_names(true),
                )
                .try_init()
        }
    };
    // Already initialized (tests, repeated calls) is fine.
    let _ = result;
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return filter;
        }
    }

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = verbosity.default_level();
    let directive = if verbosity == Verbosity::Verbose {
        format!("{},{}=debug", level, env!("CARGO_CRATE_NAME"))
    } else {
        level.to_string()
    };

    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}
