// LogViewer - platform/fs.rs
//
// Filesystem helpers used by the app layer.

use std::io;
use std::path::Path;

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8, uses lossy conversion.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_file_lossy_replaces_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.log");
        std::fs::write(&path, b"ok \xff end").unwrap();
        let content = read_file_lossy(&path).unwrap();
        assert_eq!(content, "ok \u{FFFD} end");
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = read_file_lossy(&dir.path().join("none.log")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
