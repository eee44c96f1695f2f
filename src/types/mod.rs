//! Core type definitions for mirrorsync

mod error;
mod event;
mod stats;

pub use error::SyncError;
pub use event::{EventSink, SyncEvent};
pub use stats::CycleStats;
