//! # mirrorsync - One-way periodic directory mirroring
//!
//! Each cycle walks the source tree top-down, creating and refreshing replica
//! entries, then walks the replica bottom-up, removing entries the source no
//! longer has. File equality is decided by comparing bytes. Cycles repeat on
//! a fixed interval until cancelled.

// Module declarations
pub mod commands;
pub mod config;
pub mod logging;
pub mod mapper;
pub mod reconcile;
pub mod sync;
pub mod types;
pub mod walker;

// Re-export commonly used types
pub use config::Config;
pub use sync::{SyncLoop, Synchronizer};
pub use types::{CycleStats, EventSink, SyncError, SyncEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
