//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (add request ID)
//!     → handlers.rs (extract params, call QueryEngine)
//!     → response.rs (list body or error text)
//!     → Send to client
//! ```
//!
//! # Routes
//! - `GET /classes?type=&page=&size=`
//! - `GET /classes/{mod}?type=&page=&size=`
//! - `GET /classes/search/{term}?page=&size=`
//!
//! # Design Decisions
//! - Read-only surface; no write or admin routes
//! - `size` defaults to -1 (unbounded), `page` to 0

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{ApiError, ListBody};
pub use server::{AppState, HttpServer};
