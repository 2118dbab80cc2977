//! Query Engine subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler (mod?, type?, term, page, size)
//!     → pagination.rs (page/size → skip/limit)
//!     → engine.rs
//!         → catalog::sanitize + catalog::validation
//!         → store scan (listing order) / exact match / text search
//!         → skip/limit → canonical JSON → sort → de-dup
//!     → render: "[a, b, c]"
//! ```
//!
//! # Design Decisions
//! - Results sort by their serialized form, not by any business field
//! - The engine is read-only and holds no state beyond the store handle
//!   and the allow-lists

pub mod engine;
pub mod error;
pub mod pagination;

pub use engine::{render, QueryEngine};
pub use error::QueryError;
pub use pagination::{PageSize, Pagination, UNBOUNDED_SIZE};
