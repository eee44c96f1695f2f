//! Cancellable polling loop around [`Synchronizer::run_cycle`]

use super::Synchronizer;
use crate::types::{CycleStats, SyncError, SyncEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Repeats synchronization cycles with a fixed pause between them.
#[derive(Debug, Clone)]
pub struct SyncLoop {
    synchronizer: Arc<Synchronizer>,
    interval: Duration,
}

impl SyncLoop {
    pub fn new(synchronizer: Synchronizer, interval: Duration) -> Self {
        Self {
            synchronizer: Arc::new(synchronizer),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run cycles until `token` is cancelled.
    ///
    /// Cancellation is checked before each cycle and while sleeping; a cycle
    /// already in progress runs to completion. A cycle that fails with an I/O
    /// error is reported and retried after the interval.
    ///
    /// # Errors
    /// Returns early only for errors a retry cannot fix (see [`SyncError::is_fatal`]).
    pub async fn run(&self, token: CancellationToken) -> Result<(), SyncError> {
        while !token.is_cancelled() {
            match self.run_cycle().await {
                Ok(stats) => self.emit(SyncEvent::CycleFinished {
                    stats,
                    next_cycle_in: Some(self.interval),
                }),
                Err(e) => {
                    self.emit(SyncEvent::CycleFailed {
                        error: e.to_string(),
                    });
                    if e.is_fatal() {
                        return Err(e);
                    }
                }
            }

            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        self.emit(SyncEvent::Stopped);
        Ok(())
    }

    /// Run exactly one cycle and report its outcome.
    pub async fn run_once(&self) -> Result<CycleStats, SyncError> {
        match self.run_cycle().await {
            Ok(stats) => {
                self.emit(SyncEvent::CycleFinished {
                    stats,
                    next_cycle_in: None,
                });
                Ok(stats)
            }
            Err(e) => {
                self.emit(SyncEvent::CycleFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Run one cycle on the blocking pool; the filesystem work is synchronous.
    async fn run_cycle(&self) -> Result<CycleStats, SyncError> {
        let synchronizer = Arc::clone(&self.synchronizer);
        tokio::task::spawn_blocking(move || synchronizer.run_cycle())
            .await
            .map_err(|e| SyncError::Task(e.to_string()))?
    }

    fn emit(&self, event: SyncEvent) {
        self.synchronizer.sink().emit(&event);
    }
}
