//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the API.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the query API and updater.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Document store location.
    pub store: StoreConfig,

    /// Accepted query inputs.
    pub catalog: CatalogConfig,

    /// Reload pipeline settings.
    pub updater: UpdaterConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the database snapshots.
    pub data_dir: PathBuf,

    /// Production database name. The backup database is `<database>-backup`.
    pub database: String,

    /// How often a running server checks for a rewritten snapshot, in
    /// seconds. 0 disables the check.
    pub refresh_secs: u64,
}

impl StoreConfig {
    pub fn backup_database(&self) -> String {
        format!("{}-backup", self.database)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./db"),
            database: "arma-api".to_string(),
            refresh_secs: 5,
        }
    }
}

/// Query input allow-lists.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Mods that may be requested by name.
    pub supported_mods: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let mods = [
            "vanilla",
            "ace",
            "3cb",
            "rhs",
            "niarms",
            "tacvests",
            "tryk",
            "vsm",
            "rksl",
            "acre",
            "projectopfor",
            "immersioncigs",
        ];
        Self {
            supported_mods: mods.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Reload pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpdaterConfig {
    /// Directory of JSON source files.
    pub source_dir: PathBuf,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("./data"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Optional file that receives a copy of every log line.
    pub logfile_path: Option<PathBuf>,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            logfile_path: None,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
