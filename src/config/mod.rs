//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ApiConfig (validated, immutable)
//!     → handed to startup, which builds the store, engine and updater
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::ApiConfig;
pub use schema::CatalogConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::StoreConfig;
pub use schema::UpdaterConfig;
