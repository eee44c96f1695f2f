//! Byte-for-byte file comparison

use crate::types::SyncError;
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// Compare the contents of two files byte-for-byte
///
/// Sizes are checked first; equal-sized files are streamed in 64KB chunks and
/// the comparison stops at the first differing chunk. Modification times are
/// never consulted.
pub fn files_identical(a: &Path, b: &Path) -> Result<bool, SyncError> {
    let a_len = fs::metadata(a).map_err(|e| SyncError::fs("stat", a, e))?.len();
    let b_len = fs::metadata(b).map_err(|e| SyncError::fs("stat", b, e))?.len();
    if a_len != b_len {
        return Ok(false);
    }

    let mut file_a = File::open(a).map_err(|e| SyncError::fs("open", a, e))?;
    let mut file_b = File::open(b).map_err(|e| SyncError::fs("open", b, e))?;

    let mut buf_a = vec![0u8; CHUNK_SIZE];
    let mut buf_b = vec![0u8; CHUNK_SIZE];

    loop {
        let read_a = read_chunk(&mut file_a, &mut buf_a).map_err(|e| SyncError::fs("read", a, e))?;
        let read_b = read_chunk(&mut file_b, &mut buf_b).map_err(|e| SyncError::fs("read", b, e))?;

        if read_a != read_b || buf_a[..read_a] != buf_b[..read_b] {
            return Ok(false);
        }

        if read_a == 0 {
            return Ok(true); // EOF on both
        }
    }
}

/// Fill `buf` as far as the file allows; short only at EOF
fn read_chunk(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_with(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_identical_content() {
        let a = temp_with(b"Test content for comparison");
        let b = temp_with(b"Test content for comparison");
        assert!(files_identical(a.path(), b.path()).unwrap());
    }

    #[test]
    fn test_same_size_different_content() {
        let a = temp_with(b"hello");
        let b = temp_with(b"world");
        assert!(!files_identical(a.path(), b.path()).unwrap());
    }

    #[test]
    fn test_different_size() {
        let a = temp_with(b"short");
        let b = temp_with(b"much longer content");
        assert!(!files_identical(a.path(), b.path()).unwrap());
    }

    #[test]
    fn test_empty_files_are_identical() {
        let a = temp_with(b"");
        let b = temp_with(b"");
        assert!(files_identical(a.path(), b.path()).unwrap());
    }

    #[test]
    fn test_difference_past_first_chunk() {
        let mut content_a = vec![7u8; CHUNK_SIZE * 2 + 10];
        let content_b = content_a.clone();
        let last = content_a.len() - 1;
        content_a[last] = 8;

        let a = temp_with(&content_a);
        let b = temp_with(&content_b);
        assert!(!files_identical(a.path(), b.path()).unwrap());
    }

    #[test]
    fn test_missing_file_is_error() {
        let a = temp_with(b"x");
        let result = files_identical(a.path(), Path::new("/nonexistent/file.txt"));
        assert!(matches!(result, Err(SyncError::Fs { op: "stat", .. })));
    }
}
