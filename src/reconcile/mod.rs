//! Reconciler - idempotent operations that drive replica entries toward the source
//!
//! Every operation only touches the replica tree, reports each change it makes
//! through the [`EventSink`], and does nothing (and reports nothing) when the
//! replica entry is already correct.

mod compare;
mod copy;

pub use compare::files_identical;
pub use copy::{copy_file_atomic, STAGING_PREFIX, STAGING_SUFFIX};

use crate::types::{CycleStats, EventSink, SyncError, SyncEvent};
use crate::walker::{walk, WalkOrder};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Applies reconciliation operations for one cycle and tallies what changed.
pub struct Reconciler<'a> {
    sink: &'a dyn EventSink,
    stats: CycleStats,
}

impl<'a> Reconciler<'a> {
    pub fn new(sink: &'a dyn EventSink) -> Self {
        Self {
            sink,
            stats: CycleStats::default(),
        }
    }

    /// Changes applied so far
    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    /// Create the replica root, including missing ancestors.
    ///
    /// Returns `true` if the root was created.
    pub fn ensure_root_exists(&mut self, replica_root: &Path) -> Result<bool, SyncError> {
        if replica_root.is_dir() {
            return Ok(false);
        }

        fs::create_dir_all(replica_root)
            .map_err(|e| SyncError::fs("create directory", replica_root, e))?;
        self.stats.folders_created += 1;
        self.emit(SyncEvent::FolderCreated {
            path: replica_root.to_path_buf(),
        });
        Ok(true)
    }

    /// Create `replica_dir` if it is missing.
    ///
    /// The parent must already exist (top-down traversal guarantees it). A
    /// non-directory occupying the path is removed first.
    ///
    /// Returns `true` if the directory was created.
    pub fn ensure_directory_exists(&mut self, replica_dir: &Path) -> Result<bool, SyncError> {
        match fs::symlink_metadata(replica_dir) {
            Ok(meta) if meta.is_dir() => return Ok(false),
            Ok(_) => self.remove_file(replica_dir)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(SyncError::fs("stat", replica_dir, e)),
        }

        match fs::create_dir(replica_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists && replica_dir.is_dir() => {
                return Ok(false)
            }
            Err(e) => return Err(SyncError::fs("create directory", replica_dir, e)),
        }

        self.stats.folders_created += 1;
        self.emit(SyncEvent::FolderCreated {
            path: replica_dir.to_path_buf(),
        });
        Ok(true)
    }

    /// Make `replica_file` a byte-identical copy of `source_file`.
    ///
    /// * Missing replica: copy.
    /// * Regular file with different bytes: delete, then copy.
    /// * Regular file with identical bytes: nothing.
    /// * Directory in the way: remove its contents bottom-up, then the
    ///   directory itself, then copy.
    /// * Any other entry type (symlink, fifo): delete, then copy.
    ///
    /// Returns `true` if the replica file was (re)written.
    pub fn ensure_file_synced(
        &mut self,
        source_file: &Path,
        replica_file: &Path,
    ) -> Result<bool, SyncError> {
        match fs::symlink_metadata(replica_file) {
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(SyncError::fs("stat", replica_file, e)),
            Ok(meta) if meta.is_dir() => self.remove_tree(replica_file)?,
            Ok(meta) if meta.is_file() => {
                if files_identical(source_file, replica_file)? {
                    return Ok(false);
                }
                self.remove_file(replica_file)?;
            }
            Ok(_) => self.remove_file(replica_file)?,
        }

        let bytes = copy_file_atomic(source_file, replica_file)?;
        self.stats.files_copied += 1;
        self.stats.bytes_copied += bytes;
        self.emit(SyncEvent::FileCopied {
            from: source_file.to_path_buf(),
            to: replica_file.to_path_buf(),
            bytes,
        });
        Ok(true)
    }

    /// Remove `replica_dir` if `source_dir` does not exist.
    ///
    /// The directory must already be empty; bottom-up traversal removes its
    /// contents first. A non-empty directory is an error for this cycle.
    ///
    /// Returns `true` if the directory was removed.
    pub fn ensure_directory_absent(
        &mut self,
        replica_dir: &Path,
        source_dir: &Path,
    ) -> Result<bool, SyncError> {
        if source_exists(source_dir)? {
            return Ok(false);
        }

        self.remove_directory(replica_dir)?;
        Ok(true)
    }

    /// Delete `replica_file` if `source_file` does not exist.
    ///
    /// Returns `true` if the file was removed.
    pub fn ensure_file_absent(
        &mut self,
        replica_file: &Path,
        source_file: &Path,
    ) -> Result<bool, SyncError> {
        if source_exists(source_file)? {
            return Ok(false);
        }

        self.remove_file(replica_file)?;
        Ok(true)
    }

    /// Delete a directory and everything below it, contents first, one event
    /// per removed entry.
    fn remove_tree(&mut self, dir: &Path) -> Result<(), SyncError> {
        for listing in walk(dir, WalkOrder::BottomUp) {
            let listing = listing?;
            for name in &listing.files {
                self.remove_file(&listing.path.join(name))?;
            }
            for name in &listing.dirs {
                self.remove_directory(&listing.path.join(name))?;
            }
        }
        self.remove_directory(dir)
    }

    /// Remove an empty directory, or unlink a symlink to one.
    fn remove_directory(&mut self, path: &Path) -> Result<(), SyncError> {
        let is_symlink = fs::symlink_metadata(path)
            .map(|meta| meta.file_type().is_symlink())
            .map_err(|e| SyncError::fs("stat", path, e))?;

        let removed = if is_symlink {
            fs::remove_file(path)
        } else {
            fs::remove_dir(path)
        };
        removed.map_err(|e| SyncError::fs("remove directory", path, e))?;

        self.stats.folders_removed += 1;
        self.emit(SyncEvent::FolderRemoved {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    fn remove_file(&mut self, path: &Path) -> Result<(), SyncError> {
        fs::remove_file(path).map_err(|e| SyncError::fs("remove file", path, e))?;
        self.stats.files_removed += 1;
        self.emit(SyncEvent::FileRemoved {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    fn emit(&self, event: SyncEvent) {
        self.sink.emit(&event);
    }
}

/// Existence check that surfaces stat errors instead of reporting "absent".
fn source_exists(path: &Path) -> Result<bool, SyncError> {
    path.try_exists().map_err(|e| SyncError::fs("stat", path, e))
}
