//! File-backed tracing setup.
//!
//! The dashboard owns the terminal, so log output can only go to a file.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;

/// Install the global subscriber if a log file is configured.
///
/// `RUST_LOG` takes precedence over the configured level. Returns whether a
/// subscriber was installed.
pub fn init(settings: &LoggingSettings) -> Result<bool> {
    let Some(ref path) = settings.file else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .with_context(|| format!("Invalid log level: {}", settings.level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_file_installs_nothing() {
        let settings = LoggingSettings::default();
        assert!(!init(&settings).unwrap());
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LoggingSettings {
            file: Some(dir.path().join("missing").join("floodwatch.log")),
            level: "debug".to_string(),
        };
        assert!(init(&settings).is_err());
    }
}
