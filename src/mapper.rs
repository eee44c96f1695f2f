//! Path mapping between the source and replica trees

use crate::types::SyncError;
use std::path::{Path, PathBuf};

/// Re-root `path` from `old_root` onto `new_root`, keeping the relative suffix.
///
/// # Errors
/// Returns [`SyncError::PathOutsideRoot`] if `path` is not `old_root` or one of
/// its descendants. Callers derive paths from a walk rooted at `old_root`, so
/// this indicates a bug rather than a runtime condition.
///
/// # Example
/// ```
/// use mirrorsync::mapper::map_path;
/// use std::path::{Path, PathBuf};
///
/// let mapped = map_path(Path::new("/a/x/y.txt"), Path::new("/a"), Path::new("/b"))?;
/// assert_eq!(mapped, PathBuf::from("/b/x/y.txt"));
/// # Ok::<(), mirrorsync::SyncError>(())
/// ```
pub fn map_path(path: &Path, old_root: &Path, new_root: &Path) -> Result<PathBuf, SyncError> {
    let relative = path
        .strip_prefix(old_root)
        .map_err(|_| SyncError::PathOutsideRoot {
            path: path.to_path_buf(),
            root: old_root.to_path_buf(),
        })?;

    if relative.as_os_str().is_empty() {
        Ok(new_root.to_path_buf())
    } else {
        Ok(new_root.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_nested_descendant() {
        let mapped = map_path(Path::new("/a/x/y.txt"), Path::new("/a"), Path::new("/b"))
            .expect("descendant should map");
        assert_eq!(mapped, PathBuf::from("/b/x/y.txt"));
    }

    #[test]
    fn test_root_maps_to_new_root() {
        let mapped = map_path(Path::new("/src"), Path::new("/src"), Path::new("/replica"))
            .expect("root should map");
        assert_eq!(mapped, PathBuf::from("/replica"));
    }

    #[test]
    fn test_relative_roots() {
        let mapped = map_path(
            Path::new("source/dir/file.bin"),
            Path::new("source"),
            Path::new("backup/replica"),
        )
        .expect("relative descendant should map");
        assert_eq!(mapped, PathBuf::from("backup/replica/dir/file.bin"));
    }

    #[test]
    fn test_prefix_match_is_component_wise() {
        // "/abc" shares a string prefix with "/ab" but is not under it
        let result = map_path(Path::new("/abc/file"), Path::new("/ab"), Path::new("/b"));
        assert!(matches!(result, Err(SyncError::PathOutsideRoot { .. })));
    }

    #[test]
    fn test_path_outside_root_is_rejected() {
        let err = map_path(
            Path::new("/elsewhere/file.txt"),
            Path::new("/source"),
            Path::new("/replica"),
        )
        .expect_err("unrelated path must not map");

        assert!(err.is_invariant_violation());
        match err {
            SyncError::PathOutsideRoot { path, root } => {
                assert_eq!(path, PathBuf::from("/elsewhere/file.txt"));
                assert_eq!(root, PathBuf::from("/source"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_spaces_and_unicode_names_are_preserved() {
        let mapped = map_path(
            Path::new("/a/with space/ünïcode.txt"),
            Path::new("/a"),
            Path::new("/b"),
        )
        .expect("descendant should map");
        assert_eq!(mapped, PathBuf::from("/b/with space/ünïcode.txt"));
    }
}
