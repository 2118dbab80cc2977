//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Apply the configured log level unless `RUST_LOG` overrides it
//! - Mirror log lines into an optional log file
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Console output keeps ANSI colors; the file copy does not
//! - A log file that cannot be opened is reported as a warning and logging
//!   continues on the console only

use std::fs::OpenOptions;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Filter directives used when `RUST_LOG` is unset.
pub fn default_directives(level: &str) -> String {
    format!("arma_api={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.log_level)));

    let (file, file_error) = match &config.logfile_path {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => (Some(file), None),
            Err(e) => (None, Some((path, e))),
        },
        None => (None, None),
    };
    let file_layer = file.map(|f| fmt::layer().with_ansi(false).with_writer(Mutex::new(f)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()?;

    if let Some((path, e)) = file_error {
        tracing::warn!(path = ?path, error = %e, "Could not open log file, logging to console only");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives("debug"), "arma_api=debug,tower_http=debug");
    }

    #[test]
    fn test_unopenable_log_file_does_not_fail_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("arma-api.log");
        let config = ObservabilityConfig {
            logfile_path: Some(path.clone()),
            ..ObservabilityConfig::default()
        };

        assert!(init(&config).is_ok());
        assert!(!path.exists());
    }
}
