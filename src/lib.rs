//! Arma configuration item API.
//!
//! A read-only HTTP query API over per-mod collections of game configuration
//! items, plus an updater that reloads those collections from JSON source
//! files after backing them up.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ http (axum router) ──▶ query::QueryEngine ──▶ store::MemoryStore
//!                                         │                     ▲     │
//!                                         ▼                     │     ▼
//!                                      catalog             updater  snapshot
//!                               (sanitize, validate)    (backup, ingest, index)
//!
//!   Cross-cutting: config, observability (tracing + metrics), lifecycle
//! ```

// Core subsystems
pub mod catalog;
pub mod query;
pub mod store;
pub mod updater;

// Surfaces
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::ApiConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use query::QueryEngine;
pub use store::MemoryStore;
pub use updater::Updater;
