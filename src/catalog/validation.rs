//! Allow-list validation of query inputs.
//!
//! # Design Decisions
//! - Validation runs on already-sanitized input
//! - An empty value means "no filter" and is always accepted
//! - Errors carry the offending value and the full list of accepted values

use thiserror::Error;

use crate::catalog::ItemType;

/// A query input outside the accepted values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unidentified mod ({value}). Available values are [{}]", .allowed.join(", "))]
    UnknownMod { value: String, allowed: Vec<String> },

    #[error("Unidentified object type ({value}). Available values are [{}]", .allowed.join(", "))]
    UnknownType { value: String, allowed: Vec<String> },

    #[error("Invalid page ({0}). Pages start at 0")]
    InvalidPage(i64),

    #[error("Invalid page size ({0}). Use -1 for all results or a size of 0 or more")]
    InvalidPageSize(i64),
}

/// Accepted mods and categories.
#[derive(Debug, Clone)]
pub struct Catalog {
    mods: Vec<String>,
}

impl Catalog {
    pub fn new(mods: Vec<String>) -> Self {
        Self { mods }
    }

    /// Accept `value` if it is empty or a supported mod.
    pub fn validate_mod(&self, value: &str) -> Result<(), ValidationError> {
        if value.is_empty() || self.mods.iter().any(|m| m == value) {
            Ok(())
        } else {
            Err(ValidationError::UnknownMod {
                value: value.to_string(),
                allowed: self.mods.clone(),
            })
        }
    }

    /// Accept `value` if it is empty (no filter) or one of the item categories.
    pub fn validate_type(&self, value: &str) -> Result<Option<ItemType>, ValidationError> {
        if value.is_empty() {
            return Ok(None);
        }
        value
            .parse::<ItemType>()
            .map(Some)
            .map_err(|_| ValidationError::UnknownType {
                value: value.to_string(),
                allowed: ItemType::names(),
            })
    }
}
