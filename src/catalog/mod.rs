//! Catalog domain: config items, input sanitization and allow-list validation.
//!
//! # Data Flow
//! ```text
//! raw user input (path / query string)
//!     → sanitize.rs (strip blocklisted characters)
//!     → validation.rs (mod / type allow-lists)
//!     → Query Engine
//!
//! source JSON item
//!     → item.rs (ConfigItem: type, mod, classname)
//!     → collection `data.<mod>`
//! ```

pub mod item;
pub mod sanitize;
pub mod validation;

pub use item::{collection_name, ConfigItem, ItemType, COLLECTION_PREFIX};
pub use sanitize::sanitize;
pub use validation::{Catalog, ValidationError};
