//! Lazy directory walker yielding one listing per visited directory

use crate::types::SyncError;
use std::ffi::OsString;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Order in which directories are yielded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOrder {
    /// A directory is yielded before any of its subdirectories
    TopDown,
    /// A directory is yielded after all of its subdirectories
    BottomUp,
}

/// Immediate contents of one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    /// Full path of the directory (rooted at the walk root)
    pub path: PathBuf,

    /// Names of non-directory entries, sorted
    pub files: Vec<OsString>,

    /// Names of subdirectories (including symlinks to directories), sorted
    pub dirs: Vec<OsString>,
}

/// Iterator over the directories of a tree.
///
/// Each directory's listing is read when the iterator reaches it, so a
/// bottom-up consumer sees a parent's contents as they are after its
/// subdirectories were handled. Created by [`walk`].
pub struct Walk {
    order: WalkOrder,
    root: Option<PathBuf>,
    inner: Option<walkdir::IntoIter>,
}

/// Walk the tree rooted at `root` in the given order.
///
/// Yields nothing if `root` does not exist or is not a directory. Symlinked
/// directories are listed in `dirs` but never descended into.
///
/// # Errors
/// A directory that vanishes before it is read is skipped. Any other read
/// failure is yielded as an `Err` item.
pub fn walk(root: impl Into<PathBuf>, order: WalkOrder) -> Walk {
    Walk {
        order,
        root: Some(root.into()),
        inner: None,
    }
}

impl Iterator for Walk {
    type Item = Result<DirListing, SyncError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            if !root.is_dir() {
                return None;
            }
            let walker = WalkDir::new(root)
                .follow_links(false)
                .sort_by_file_name()
                .contents_first(self.order == WalkOrder::BottomUp);
            self.inner = Some(walker.into_iter());
        }

        let inner = self.inner.as_mut()?;
        for entry in inner {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if is_not_found(&e) => continue,
                Err(e) => return Some(Err(walk_error(e, Path::new("")))),
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            match read_listing(entry.path()) {
                Ok(Some(listing)) => return Some(Ok(listing)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

impl std::fmt::Debug for Walk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walk")
            .field("order", &self.order)
            .field("started", &self.inner.is_some())
            .finish_non_exhaustive()
    }
}

/// Read the immediate entries of one directory.
///
/// Returns `Ok(None)` if the directory no longer exists.
fn read_listing(dir: &Path) -> Result<Option<DirListing>, SyncError> {
    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_not_found(&e) && e.depth() == 0 => return Ok(None),
            // Entry removed between readdir and stat
            Err(e) if is_not_found(&e) => continue,
            Err(e) => return Err(walk_error(e, dir)),
        };
        let name = entry.file_name().to_os_string();

        if entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir()) {
            dirs.push(name);
        } else {
            files.push(name);
        }
    }

    Ok(Some(DirListing {
        path: dir.to_path_buf(),
        files,
        dirs,
    }))
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == ErrorKind::NotFound)
}

fn walk_error(err: walkdir::Error, fallback: &Path) -> SyncError {
    let path = err.path().unwrap_or(fallback).to_path_buf();
    SyncError::fs("read directory", &path, io::Error::from(err))
}
