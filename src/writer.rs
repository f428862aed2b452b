//! Output writing for processed tables.
//!
//! The pipeline itself never touches the filesystem; callers use these
//! helpers to persist a result as CSV or Parquet under a timestamped name.

use crate::constants::{FILE_TIMESTAMP_FORMAT, PROCESSED_FILE_MARKER};
use crate::error::{ProcessorError, Result};
use crate::models::OutputFormat;
use chrono::{DateTime, TimeZone};
use polars::prelude::*;
use std::fmt::Display;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Build `<input stem>_processed_<YYYYmmdd_HHMMSS>.<ext>`
pub fn output_file_name<Tz>(input: &Path, format: OutputFormat, timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("output");

    format!(
        "{}{}{}.{}",
        stem,
        PROCESSED_FILE_MARKER,
        timestamp.format(FILE_TIMESTAMP_FORMAT),
        format.extension()
    )
}

/// Write a table into `directory`, creating it if needed
pub fn write_output(
    frame: &mut DataFrame,
    directory: &Path,
    file_name: &str,
    format: OutputFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(directory)?;
    let path = directory.join(file_name);
    let file = File::create(&path)?;

    let written = match format {
        OutputFormat::Csv => {
            let mut file = file;
            CsvWriter::new(&mut file).include_header(true).finish(frame)
        }
        OutputFormat::Parquet => ParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .finish(frame)
            .map(|_| ()),
    };

    if let Err(e) = written {
        // No partial file may remain in the output directory
        if let Err(remove_error) = fs::remove_file(&path) {
            warn!(
                "Failed to remove partial output {}: {}",
                path.display(),
                remove_error
            );
        }
        return Err(ProcessorError::OutputFailed {
            path,
            reason: e.to_string(),
        });
    }

    debug!("Wrote {} rows to {}", frame.height(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use tempfile::TempDir;

    fn timestamp() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2025, 1, 5)
            .unwrap()
            .and_hms_opt(15, 7, 9)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn test_output_file_name() {
        let name = output_file_name(
            Path::new("/uploads/export.xlsx"),
            OutputFormat::Csv,
            &timestamp(),
        );
        assert_eq!(name, "export_processed_20250105_150709.csv");

        let name = output_file_name(Path::new(""), OutputFormat::Parquet, &timestamp());
        assert_eq!(name, "output_processed_20250105_150709.parquet");
    }

    #[test]
    fn test_write_csv_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let directory = temp_dir.path().join("data").join("outputs");
        let mut frame = df!(
            "Full Address" => ["1 Main Street, X, NY 10001"],
            "Processed Date" => ["January 05, 2025 at 03:07 PM"]
        )
        .unwrap();

        let path = write_output(&mut frame, &directory, "out.csv", OutputFormat::Csv).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Full Address,Processed Date"));
        assert_eq!(
            lines.next(),
            Some("\"1 Main Street, X, NY 10001\",\"January 05, 2025 at 03:07 PM\"")
        );
    }

    #[test]
    fn test_write_parquet() {
        let temp_dir = TempDir::new().unwrap();
        let mut frame = df!("Full Address" => ["A", "B"]).unwrap();

        let path = write_output(
            &mut frame,
            temp_dir.path(),
            "out.parquet",
            OutputFormat::Parquet,
        )
        .unwrap();

        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let nested = Series::new(
            "Parcels".into(),
            &[Series::new("".into(), &[1i32, 2]), Series::new("".into(), &[3i32])],
        );
        let mut frame = DataFrame::new(vec![nested.into()]).unwrap();

        let err = write_output(
            &mut frame,
            temp_dir.path(),
            "sales_processed_20250105_150709.csv",
            OutputFormat::Csv,
        )
        .unwrap_err();

        assert!(matches!(err, ProcessorError::OutputFailed { .. }));
        assert!(
            !temp_dir
                .path()
                .join("sales_processed_20250105_150709.csv")
                .exists()
        );
        assert!(crate::history::list_processed_files(temp_dir.path())
            .unwrap()
            .is_empty());
    }
}
