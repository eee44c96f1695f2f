//! Configuration management
//!
//! Inputs come from the command line, optionally layered over a TOML file.
//! Command-line values win. The merged result is validated once, up front.

use crate::types::SyncError;
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Command-line arguments
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "mirrorsync", version, about = "Periodically mirror a source directory onto a replica")]
pub struct Cli {
    /// Source directory (read-only, authoritative)
    #[arg(long, alias = "source_folder", value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Replica directory (driven to match the source)
    #[arg(long, alias = "replica_folder", value_name = "DIR")]
    pub replica: Option<PathBuf>,

    /// Seconds to sleep between cycles
    #[arg(long, alias = "interval_seconds", value_name = "SECS",
          value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Log file (appended to, in addition to console output)
    #[arg(long = "log-file", alias = "log_file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// TOML file supplying any of the above
    #[arg(long, short, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,
}

/// Settings read from a TOML config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub source: Option<PathBuf>,
    pub replica: Option<PathBuf>,
    pub interval_seconds: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    /// Load and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let content = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| SyncError::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Validated configuration for a mirrorsync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Replica directory
    pub replica: PathBuf,

    /// Pause between cycles
    pub interval: Duration,

    /// Persistent log destination
    pub log_file: PathBuf,

    /// Stop after one cycle
    pub once: bool,
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        let config = Config::merge(cli, file)?;
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Combine CLI and file settings without touching the filesystem
    pub fn merge(cli: Cli, file: FileConfig) -> Result<Self, SyncError> {
        let source = require(cli.source.or(file.source), "source")?;
        let replica = require(cli.replica.or(file.replica), "replica")?;
        let interval_seconds = require(cli.interval.or(file.interval_seconds), "interval")?;
        let log_file = require(cli.log_file.or(file.log_file), "log file")?;

        if interval_seconds == 0 {
            return Err(SyncError::Config(
                "Interval must be at least 1 second".to_string(),
            ));
        }

        Ok(Self {
            source,
            replica,
            interval: Duration::from_secs(interval_seconds),
            log_file,
            once: cli.once,
        })
    }

    /// Validate configuration against the filesystem
    pub fn validate(&self) -> Result<(), SyncError> {
        if !self.source.is_dir() {
            return Err(SyncError::Config(format!(
                "Source path does not exist or is not a directory: {}",
                self.source.display()
            )));
        }

        let source = resolve(&self.source)?;
        let replica = resolve(&self.replica)?;
        let log_file = resolve(&self.log_file)?;

        if source == replica {
            return Err(SyncError::Config(
                "Source and replica cannot be the same".to_string(),
            ));
        }

        if replica.starts_with(&source) {
            return Err(SyncError::Config(format!(
                "Replica {} is inside source {}",
                replica.display(),
                source.display()
            )));
        }

        if source.starts_with(&replica) {
            return Err(SyncError::Config(format!(
                "Source {} is inside replica {}",
                source.display(),
                replica.display()
            )));
        }

        // Anything under the replica without a source counterpart gets pruned
        if log_file.starts_with(&replica) {
            return Err(SyncError::Config(format!(
                "Log file {} is inside replica {}",
                log_file.display(),
                replica.display()
            )));
        }

        Ok(())
    }
}

fn require<T>(value: Option<T>, name: &str) -> Result<T, SyncError> {
    value.ok_or_else(|| {
        SyncError::Config(format!(
            "Missing {name}: pass it on the command line or in the config file"
        ))
    })
}

/// Absolute, symlink-resolved form of `path`, which need not exist yet.
///
/// The longest existing ancestor is canonicalized and the remaining
/// components are appended lexically.
fn resolve(path: &Path) -> Result<PathBuf, SyncError> {
    let absolute = std::path::absolute(path).map_err(|e| {
        SyncError::Config(format!("Cannot resolve path {}: {}", path.display(), e))
    })?;

    let mut existing = absolute.as_path();
    let mut tail = Vec::new();
    let base = loop {
        match existing.canonicalize() {
            Ok(base) => break base,
            Err(_) => match (existing.parent(), existing.file_name()) {
                (Some(parent), Some(name)) => {
                    tail.push(name.to_os_string());
                    existing = parent;
                }
                _ => break existing.to_path_buf(),
            },
        }
    };

    let mut resolved = base;
    for name in tail.into_iter().rev() {
        resolved.push(name);
    }

    // `absolute` keeps `..` in the missing tail; fold it lexically
    let mut normalized = PathBuf::new();
    for component in resolved.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}
