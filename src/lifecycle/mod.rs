//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Parse CLI → Load config → Logging/metrics → Open store
//!         → --updater: Reload pipeline → exit
//!         → otherwise: Bind listener → Spawn snapshot refresh → Serve
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then store, then listeners
//! - Ordered shutdown: stop accept, drain, close

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Cli, StartupError};
