//! Log output: console plus persistent file, fed by synchronizer events

use crate::types::{EventSink, SyncError, SyncEvent};
use std::fs;
use std::path::Path;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::{self, time::ChronoLocal};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Install the process-wide subscriber writing to stdout and `log_file`.
///
/// The file is appended to, never truncated. Level filtering follows
/// `RUST_LOG`, defaulting to `info`. Keep the returned guard alive for the
/// life of the process; dropping it flushes buffered file output.
pub fn init_logging(log_file: &Path) -> Result<WorkerGuard, SyncError> {
    let file_name = log_file.file_name().ok_or_else(|| {
        SyncError::Config(format!("Log file has no file name: {}", log_file.display()))
    })?;
    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(directory)
        .map_err(|e| SyncError::fs("create log directory", directory, e))?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
                .with_target(false)
                .with_writer(std::io::stdout),
        )
        .with(
            fmt::layer()
                .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
                .with_target(false)
                .with_ansi(false) // No ANSI colors in log files
                .with_writer(file_writer),
        )
        .try_init()
        .map_err(|e| SyncError::Config(format!("Failed to initialize logging: {e}")))?;

    Ok(guard)
}

/// Event sink that writes one `tracing` record per event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &SyncEvent) {
        match event {
            SyncEvent::FolderCreated { path } => info!("Created folder {}.", path.display()),
            SyncEvent::FileCopied { from, to, bytes } => info!(
                bytes,
                "Copied file from {} to {}.",
                from.display(),
                to.display()
            ),
            SyncEvent::FileRemoved { path } => info!("Removed file {}.", path.display()),
            SyncEvent::FolderRemoved { path } => info!("Removed folder {}.", path.display()),
            SyncEvent::CycleFinished {
                stats,
                next_cycle_in: Some(interval),
            } => info!(
                actions = stats.actions(),
                "Synchronization finished. Repeating again in {} seconds.",
                interval.as_secs()
            ),
            SyncEvent::CycleFinished {
                stats,
                next_cycle_in: None,
            } => info!(actions = stats.actions(), "Synchronization finished."),
            SyncEvent::CycleFailed { error } => error!("Synchronization cycle aborted: {error}"),
            SyncEvent::Stopped => info!("Synchronization stopped."),
        }
    }
}
