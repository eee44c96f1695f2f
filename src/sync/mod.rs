//! Synchronization cycle and the polling loop that repeats it

mod service;

pub use service::SyncLoop;

use crate::mapper::map_path;
use crate::reconcile::Reconciler;
use crate::types::{CycleStats, EventSink, SyncError};
use crate::walker::{walk, WalkOrder};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Mirrors one source tree onto one replica tree.
///
/// Holds no state between cycles; every cycle rescans both trees in full.
pub struct Synchronizer {
    source: PathBuf,
    replica: PathBuf,
    sink: Arc<dyn EventSink>,
}

impl Synchronizer {
    pub fn new(
        source: impl Into<PathBuf>,
        replica: impl Into<PathBuf>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            source: source.into(),
            replica: replica.into(),
            sink,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn replica(&self) -> &Path {
        &self.replica
    }

    pub fn sink(&self) -> &dyn EventSink {
        self.sink.as_ref()
    }

    /// Run one full cycle: propagate, then prune.
    ///
    /// The first error aborts the cycle, leaving it partially applied. The
    /// next cycle converges whatever was left.
    pub fn run_cycle(&self) -> Result<CycleStats, SyncError> {
        let mut reconciler = Reconciler::new(self.sink.as_ref());

        if self.source.is_dir() {
            reconciler.ensure_root_exists(&self.replica)?;
        }
        self.propagate(&mut reconciler)?;
        self.prune(&mut reconciler)?;

        Ok(reconciler.stats())
    }

    /// Top-down pass creating and updating replica entries to match the source.
    pub fn propagate(&self, reconciler: &mut Reconciler<'_>) -> Result<(), SyncError> {
        for listing in walk(&self.source, WalkOrder::TopDown) {
            let listing = listing?;
            let replica_dir = map_path(&listing.path, &self.source, &self.replica)?;

            // Subdirectories first, so the walk can populate them next
            for name in &listing.dirs {
                reconciler.ensure_directory_exists(&replica_dir.join(name))?;
            }

            for name in &listing.files {
                reconciler.ensure_file_synced(&listing.path.join(name), &replica_dir.join(name))?;
            }
        }
        Ok(())
    }

    /// Bottom-up pass removing replica entries that no longer exist in the source.
    pub fn prune(&self, reconciler: &mut Reconciler<'_>) -> Result<(), SyncError> {
        for listing in walk(&self.replica, WalkOrder::BottomUp) {
            let listing = listing?;
            let source_dir = map_path(&listing.path, &self.replica, &self.source)?;

            for name in &listing.files {
                reconciler.ensure_file_absent(&listing.path.join(name), &source_dir.join(name))?;
            }

            for name in &listing.dirs {
                reconciler.ensure_directory_absent(&listing.path.join(name), &source_dir.join(name))?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("source", &self.source)
            .field("replica", &self.replica)
            .finish_non_exhaustive()
    }
}
