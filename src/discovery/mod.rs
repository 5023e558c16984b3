//! Discovery of log files under an input directory.

use crate::utils::error::DiscoveryError;
use log::{debug, info};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A log file selected for scanning
///
/// **Public** - returned from `discover_logs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// Full path to the file
    pub path: PathBuf,

    /// Path relative to the input directory
    pub relative: PathBuf,
}

impl LogFile {
    /// Name used in report file names: the relative path with separators flattened to `_`
    pub fn flat_name(&self) -> String {
        self.relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("_")
    }
}

/// Recursively collect regular files whose path contains `filter`
///
/// **Public** - main entry point for discovery
///
/// # Arguments
/// * `input_dir` - Directory to walk
/// * `filter` - Substring the file path must contain (empty selects everything)
///
/// # Returns
/// Matching files sorted by path
///
/// # Errors
/// * `DiscoveryError::MissingDirectory` - `input_dir` is not a directory
/// * `DiscoveryError::WalkFailed` - unreadable directory entry
pub fn discover_logs(input_dir: &Path, filter: &str) -> Result<Vec<LogFile>, DiscoveryError> {
    if !input_dir.is_dir() {
        return Err(DiscoveryError::MissingDirectory(input_dir.to_path_buf()));
    }

    debug!("Walking {} (filter: {:?})", input_dir.display(), filter);

    let mut files = Vec::new();

    for entry in WalkDir::new(input_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !path.to_string_lossy().contains(filter) {
            continue;
        }

        let relative = path
            .strip_prefix(input_dir)
            .unwrap_or(path)
            .to_path_buf();

        files.push(LogFile {
            path: path.to_path_buf(),
            relative,
        });
    }

    info!("Found {} log files in {}", files.len(), input_dir.display());

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_flat_name() {
        let file = LogFile {
            path: PathBuf::from("logs/app/server.log"),
            relative: PathBuf::from("app/server.log"),
        };
        assert_eq!(file.flat_name(), "app_server.log");
    }

    #[test]
    fn test_discover_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("app.log"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("nested/worker.log"), "").unwrap();

        let files = discover_logs(dir.path(), ".log").unwrap();
        let names: Vec<String> = files.iter().map(LogFile::flat_name).collect();

        assert_eq!(names, vec!["app.log", "nested_worker.log"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = discover_logs(&dir.path().join("absent"), "");
        assert!(matches!(result, Err(DiscoveryError::MissingDirectory(_))));
    }

    #[test]
    fn test_discover_calls_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.log"), "").unwrap();

        let first = discover_logs(dir.path(), "").unwrap();
        let second = discover_logs(dir.path(), "").unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }
}
