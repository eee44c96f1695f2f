//! SyncEvent - State changes reported by the synchronizer

use super::CycleStats;
use std::path::PathBuf;
use std::time::Duration;

/// Events emitted while mirroring, one per change applied to the replica.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// A replica directory was created
    FolderCreated { path: PathBuf },

    /// A source file was copied into the replica
    FileCopied {
        from: PathBuf,
        to: PathBuf,
        bytes: u64,
    },

    /// A replica file was deleted
    FileRemoved { path: PathBuf },

    /// A replica directory was deleted
    FolderRemoved { path: PathBuf },

    /// A cycle completed; `next_cycle_in` is the sleep before the next one,
    /// `None` when no further cycle is scheduled
    CycleFinished {
        stats: CycleStats,
        next_cycle_in: Option<Duration>,
    },

    /// A cycle was aborted by an error; the next cycle retries
    CycleFailed { error: String },

    /// The loop observed cancellation and exited
    Stopped,
}

impl SyncEvent {
    /// Short label used in log output and tests
    pub fn kind(&self) -> &'static str {
        match self {
            SyncEvent::FolderCreated { .. } => "folder-created",
            SyncEvent::FileCopied { .. } => "file-copied",
            SyncEvent::FileRemoved { .. } => "file-removed",
            SyncEvent::FolderRemoved { .. } => "folder-removed",
            SyncEvent::CycleFinished { .. } => "cycle-finished",
            SyncEvent::CycleFailed { .. } => "cycle-failed",
            SyncEvent::Stopped => "stopped",
        }
    }

    /// True for the four events that record a change to the replica
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            SyncEvent::FolderCreated { .. }
                | SyncEvent::FileCopied { .. }
                | SyncEvent::FileRemoved { .. }
                | SyncEvent::FolderRemoved { .. }
        )
    }
}

/// Receiver for synchronizer events.
///
/// Handed to the synchronizer at construction, so each instance reports to
/// its own sink. Any `Fn(&SyncEvent)` closure is a sink.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &SyncEvent);
}

impl<F> EventSink for F
where
    F: Fn(&SyncEvent) + Send + Sync,
{
    fn emit(&self, event: &SyncEvent) {
        self(event)
    }
}
