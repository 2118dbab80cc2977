//! Document store subsystem.
//!
//! # Data Flow
//! ```text
//! Query Engine (read-only)            Reload Pipeline (read/write)
//!     → DocumentStore::find               → DocumentStore::find / insert / delete_many
//!     → TextSearchable::find_text         → TextSearchable::create_text_index
//!            │                                      │
//!            └──────────────► memory.rs ◄───────────┘
//!                             (DashMap<name, Collection>)
//!                                  │
//!                                  ├─ collection.rs (documents + text index)
//!                                  └─ flush → <data_dir>/<database>.json
//! ```
//!
//! # Design Decisions
//! - The store is an explicit handle passed to its consumers; no globals
//! - Each operation is atomic per collection; there are no cross-collection
//!   transactions
//! - Full-text search is a separate capability trait so a store without it
//!   can still serve exact-match queries

pub mod collection;
pub mod document;
pub mod filter;
pub mod memory;
pub mod text_index;

use std::path::PathBuf;
use thiserror::Error;

pub use document::Document;
pub use filter::Filter;
pub use memory::MemoryStore;

/// Errors raised by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing location cannot be reached or its snapshot is unreadable.
    #[error("store unreachable at {path}: {reason}")]
    Connectivity { path: PathBuf, reason: String },

    /// A text query was issued against a collection without a text index.
    #[error("text index required for text query on collection {0}")]
    TextIndexRequired(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Minimal document-database contract used by the query and reload paths.
///
/// Reads of a collection that does not exist behave like reads of an empty
/// collection. Inserting into a missing collection creates it.
pub trait DocumentStore: Send + Sync {
    /// Names of all collections, in ascending order.
    fn list_collection_names(&self) -> Vec<String>;

    /// Create the collection if it does not exist yet.
    fn create_collection(&self, name: &str);

    /// Documents matching `filter`, in insertion order.
    fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<(), StoreError>;

    /// Remove every document matching `filter`. Returns the number removed.
    fn delete_many(&self, collection: &str, filter: &Filter) -> Result<usize, StoreError>;

    /// Drop all secondary indexes of the collection.
    fn drop_indexes(&self, collection: &str) -> Result<(), StoreError>;

    fn estimated_document_count(&self, collection: &str) -> usize;

    /// Persist the current state to the backing location.
    fn flush(&self) -> Result<(), StoreError>;
}

/// Full-text search capability.
pub trait TextSearchable {
    /// Build (or rebuild) a text index over every string field of the collection.
    fn create_text_index(&self, collection: &str) -> Result<(), StoreError>;

    /// Documents matching the text query, in insertion order.
    fn find_text(&self, collection: &str, query: &str) -> Result<Vec<Document>, StoreError>;
}
