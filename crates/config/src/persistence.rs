//! File system persistence shared by both stores
//!
//! Writes go to a temporary file in the target's directory which is then
//! renamed over the target, so a crash mid-write never leaves a truncated
//! file behind.

use crate::{ConfigError, ConfigResult};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Ensures a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> ConfigResult<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path).map_err(|e| ConfigError::DirectoryCreationError {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::info!("Created directory: {}", path.display());
    }
    Ok(())
}

/// Reads a whole file as UTF-8 text
pub fn read_to_string(path: &Path) -> ConfigResult<String> {
    fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Replaces the contents of `path` with `content` atomically
pub fn write_atomic(path: &Path, content: &str) -> ConfigResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => {
            return Err(ConfigError::PathResolutionError {
                reason: format!("{} has no parent directory", path.display()),
            })
        }
    };
    ensure_directory_exists(dir)?;

    let write_error = |e: std::io::Error| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };

    let mut temp_file = NamedTempFile::new_in(dir).map_err(write_error)?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(write_error)?;
    temp_file.flush().map_err(write_error)?;
    temp_file.persist(path).map_err(|e| write_error(e.error))?;

    log::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic_creates_parent_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("a").join("b").join("file.txt");

        write_atomic(&path, "hello").expect("Should write");
        assert_eq!(fs::read_to_string(&path).expect("Should read"), "hello");
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("file.txt");

        write_atomic(&path, "a much longer first version").expect("Should write");
        write_atomic(&path, "short").expect("Should overwrite");
        assert_eq!(fs::read_to_string(&path).expect("Should read"), "short");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("file.txt");

        write_atomic(&path, "one").expect("Should write");
        write_atomic(&path, "two").expect("Should write");

        let count = fs::read_dir(temp_dir.path())
            .expect("Should list")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_read_missing_file_is_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = read_to_string(&temp_dir.path().join("missing.txt"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
