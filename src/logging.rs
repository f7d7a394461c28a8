//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events; front-ends call [`init`] once to
//! decide where they go. `RUST_LOG` takes precedence over the configured
//! level. Calling [`init`] again is harmless: only the first call installs a
//! subscriber.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt};

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Appends to this file, creating it and its parent directory if needed.
    File(PathBuf),
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// * [`Error::Io`](crate::Error::Io) - If the log file cannot be opened
pub fn init(level: &str, target: LogTarget) -> crate::Result<()> {
    let builder = fmt().with_env_filter(filter(level)).with_target(false);

    let installed = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
