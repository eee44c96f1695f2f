//! Atomic file copy implementation

use crate::types::SyncError;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Prefix of the hidden temporary file a copy is staged in
pub const STAGING_PREFIX: &str = ".mirrorsync-";

/// Suffix of the hidden temporary file a copy is staged in
pub const STAGING_SUFFIX: &str = ".part";

/// Copy a file atomically using the write-then-rename strategy
///
/// 1. Stream `src` into a freshly created temp file next to `dest`
/// 2. Flush and sync to disk
/// 3. Apply the source permissions and mtime
/// 4. Rename over `dest`
///
/// The temp file is created exclusively under a random name, so it never
/// clobbers an existing replica entry. The parent of `dest` must already
/// exist. On failure the temp file is deleted when it is dropped; one left
/// behind by a crash has no source counterpart and is pruned by the next cycle.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, SyncError> {
    if dest.file_name().is_none() {
        return Err(SyncError::fs(
            "copy to",
            dest,
            std::io::Error::new(ErrorKind::InvalidInput, "destination has no file name"),
        ));
    }
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut src_file = File::open(src).map_err(|e| SyncError::fs("open", src, e))?;
    let mut staged = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .suffix(STAGING_SUFFIX)
        .tempfile_in(parent)
        .map_err(|e| SyncError::fs("create", dest, e))?;

    let bytes = write_staged(src, &mut src_file, &mut staged)?;

    staged
        .persist(dest)
        .map_err(|e| SyncError::fs("rename", dest, e.error))?;
    Ok(bytes)
}

fn write_staged(
    src: &Path,
    src_file: &mut File,
    staged: &mut NamedTempFile,
) -> Result<u64, SyncError> {
    let staged_path = staged.path().to_path_buf();
    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = match src_file.read(&mut buffer) {
            Ok(0) => break, // EOF
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SyncError::fs("read", src, e)),
        };

        staged
            .write_all(&buffer[..bytes_read])
            .map_err(|e| SyncError::fs("write", &staged_path, e))?;
        total_bytes += bytes_read as u64;
    }

    staged
        .as_file()
        .sync_all()
        .map_err(|e| SyncError::fs("sync", &staged_path, e))?;

    let src_metadata = fs::metadata(src).map_err(|e| SyncError::fs("stat", src, e))?;
    fs::set_permissions(&staged_path, src_metadata.permissions())
        .map_err(|e| SyncError::fs("set permissions on", &staged_path, e))?;

    let mtime = src_metadata
        .modified()
        .map_err(|e| SyncError::fs("read mtime of", src, e))?;
    filetime::set_file_mtime(&staged_path, filetime::FileTime::from_system_time(mtime))
        .map_err(|e| SyncError::fs("set mtime on", &staged_path, e))?;

    Ok(total_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dir_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_copy_leaves_only_destination() {
        let temp_dir = TempDir::new().unwrap();
        let src_dir = temp_dir.path().join("src");
        let dst_dir = temp_dir.path().join("dst");
        fs::create_dir(&src_dir).unwrap();
        fs::create_dir(&dst_dir).unwrap();
        fs::write(src_dir.join("report.txt"), b"report").unwrap();

        copy_file_atomic(&src_dir.join("report.txt"), &dst_dir.join("report.txt")).unwrap();

        assert_eq!(dir_names(&dst_dir), vec!["report.txt"]);
    }

    #[test]
    fn test_copy_does_not_touch_sibling_with_staging_like_name() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let lookalike = root.join(".a.mirrorsync-part");
        fs::write(&lookalike, b"keep me").unwrap();
        fs::write(root.join("src.bin"), b"payload").unwrap();

        copy_file_atomic(&root.join("src.bin"), &root.join("a")).unwrap();

        assert_eq!(fs::read(&lookalike).unwrap(), b"keep me");
        assert_eq!(fs::read(root.join("a")).unwrap(), b"payload");
    }

    #[test]
    fn test_copy_rejects_destination_without_name() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("a");
        fs::write(&src, b"a").unwrap();

        assert!(copy_file_atomic(&src, Path::new("/")).is_err());
    }
}
