//! Listing of previously processed outputs.

use crate::constants::{PROCESSED_DATE_FORMAT, PROCESSED_FILE_MARKER};
use crate::error::{ProcessorError, Result};
use crate::models::OutputFormat;
use chrono::{DateTime, Local};
use glob::{Pattern, glob};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A processed file found in the output directory
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub path: PathBuf,
    pub file_name: String,
    pub modified: DateTime<Local>,
    pub size_bytes: u64,
}

impl HistoryEntry {
    /// Modification time as shown to users
    pub fn modified_display(&self) -> String {
        self.modified.format(PROCESSED_DATE_FORMAT).to_string()
    }
}

/// Processed files in `directory`, newest first. A missing directory has no history.
pub fn list_processed_files(directory: &Path) -> Result<Vec<HistoryEntry>> {
    if !directory.is_dir() {
        debug!("No output directory at {}", directory.display());
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}/*{}*",
        Pattern::escape(&directory.to_string_lossy()),
        PROCESSED_FILE_MARKER
    );
    let paths = glob(&pattern).map_err(|e| {
        ProcessorError::configuration(format!("Invalid history pattern '{}': {}", pattern, e))
    })?;

    let mut entries = Vec::new();
    for path in paths {
        let path = match path {
            Ok(path) => path,
            Err(e) => {
                warn!("Skipping unreadable history entry: {}", e);
                continue;
            }
        };

        let is_output = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == OutputFormat::Csv.extension() || ext == OutputFormat::Parquet.extension());
        if !path.is_file() || !is_output {
            continue;
        }

        let metadata = path.metadata()?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        entries.push(HistoryEntry {
            modified: DateTime::<Local>::from(metadata.modified()?),
            size_bytes: metadata.len(),
            file_name,
            path,
        });
    }

    entries.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| a.file_name.cmp(&b.file_name))
    });

    debug!(
        "Found {} processed files in {}",
        entries.len(),
        directory.display()
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, age_secs: u64) {
        let path = dir.join(name);
        fs::write(&path, "Full Address\n").unwrap();
        let file = File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
    }

    #[test]
    fn test_missing_directory_has_no_history() {
        let temp_dir = TempDir::new().unwrap();
        let entries = list_processed_files(&temp_dir.path().join("absent")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_lists_processed_files_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a_processed_20240101_000000.csv", 300);
        touch(temp_dir.path(), "b_processed_20240102_000000.parquet", 10);
        touch(temp_dir.path(), "c_processed_20240103_000000.csv", 100);
        touch(temp_dir.path(), "notes.csv", 0);
        touch(temp_dir.path(), "d_processed_20240104_000000.txt", 0);

        let entries = list_processed_files(temp_dir.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.file_name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "b_processed_20240102_000000.parquet",
                "c_processed_20240103_000000.csv",
                "a_processed_20240101_000000.csv",
            ]
        );
        assert!(entries.iter().all(|e| e.size_bytes > 0));
        assert!(!entries[0].modified_display().is_empty());
    }
}
