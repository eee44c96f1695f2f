//! Main sync command

use crate::logging::TracingSink;
use crate::sync::{SyncLoop, Synchronizer};
use crate::types::{EventSink, SyncError};
use crate::Config;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Run the sync command, reporting through the process-wide `tracing` subscriber.
pub async fn run(config: Config, token: CancellationToken) -> Result<(), SyncError> {
    run_with_sink(config, Arc::new(TracingSink), token).await
}

/// Run the sync command with an explicit event sink.
///
/// With `config.once` a single cycle runs and its error, if any, is returned.
/// Otherwise cycles repeat until `token` is cancelled.
pub async fn run_with_sink(
    config: Config,
    sink: Arc<dyn EventSink>,
    token: CancellationToken,
) -> Result<(), SyncError> {
    let synchronizer = Synchronizer::new(config.source, config.replica, sink);
    let sync_loop = SyncLoop::new(synchronizer, config.interval);

    if config.once {
        sync_loop.run_once().await?;
        return Ok(());
    }

    sync_loop.run(token).await
}
