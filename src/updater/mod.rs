//! Reload Pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! --updater
//!     → pipeline.rs
//!         1. backup: production collection → backup collection, clear production
//!         2. backup indexing: drop + rebuild text index on every backup collection
//!         3. ingest: source.rs lists <source_dir>/*.json
//!                    → each array item → ConfigItem → data.<mod>
//!         4. production indexing: rebuild text index on every production collection
//!     → flush both stores
//!     → report.rs (aggregate success + per-file outcome)
//! ```
//!
//! # Design Decisions
//! - Degrades gracefully: a bad file or item is recorded and skipped
//! - The backup of a collection is complete before that collection is cleared
//! - Nothing is written to disk until all stages finish

pub mod pipeline;
pub mod report;
pub mod source;

pub use pipeline::Updater;
pub use report::{FileOutcome, IngestError, UpdateError, UpdateReport};
