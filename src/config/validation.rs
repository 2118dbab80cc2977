//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges
//! - Reject mod names that could never pass input sanitization
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ApiConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::catalog::sanitize::BLOCKLIST;
use crate::config::schema::ApiConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every semantic constraint of `config`.
pub fn validate_config(config: &ApiConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.store.database.trim().is_empty() {
        errors.push(ValidationError::new("store.database", "must not be empty"));
    }

    if config.catalog.supported_mods.is_empty() {
        errors.push(ValidationError::new("catalog.supported_mods", "must list at least one mod"));
    }
    for name in &config.catalog.supported_mods {
        if name.is_empty() {
            errors.push(ValidationError::new("catalog.supported_mods", "mod names must not be empty"));
        } else if name.chars().any(|c| BLOCKLIST.contains(&c)) {
            errors.push(ValidationError::new(
                "catalog.supported_mods",
                format!("'{name}' contains a character stripped from user input"),
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ApiConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ApiConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.catalog.supported_mods = vec!["ace".into(), "bad$mod".into(), String::new()];

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "timeouts.request_secs",
                "catalog.supported_mods",
                "catalog.supported_mods",
            ]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ApiConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
