//! Core data structures and types for address processing.
//!
//! Defines run statistics, pipeline results and output formats used
//! throughout the library.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing statistics for a single run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    pub rows_loaded: usize,
    pub rows_excluded_by_class: usize,
    pub duplicates_removed: usize,
    pub unparseable_sale_dates: usize,
    pub rows_output: usize,
    pub processing_time_ms: u128,
}

/// Table produced by a successful run
#[derive(Debug, Clone)]
pub struct ProcessedData {
    pub frame: DataFrame,
    /// Value stamped into every row's Processed Date
    pub processed_at: String,
    pub stats: ProcessingStats,
}

impl ProcessedData {
    /// True when no row qualified; still a successful run
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

/// Result of a top-level run as seen by a caller
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    /// Pipeline completed; the table may have zero rows
    Processed(ProcessedData),
    /// The input had no rows or could not be read as a table
    EmptyInput { diagnostic: String },
    /// Any other failure; no partial result is available
    Failed { diagnostic: String },
}

impl ProcessOutcome {
    pub fn data(&self) -> Option<&ProcessedData> {
        match self {
            ProcessOutcome::Processed(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<ProcessedData> {
        match self {
            ProcessOutcome::Processed(data) => Some(data),
            _ => None,
        }
    }

    /// Human-readable reason when no result was produced
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            ProcessOutcome::Processed(_) => None,
            ProcessOutcome::EmptyInput { diagnostic } | ProcessOutcome::Failed { diagnostic } => {
                Some(diagnostic)
            }
        }
    }

    pub fn is_empty_input(&self) -> bool {
        matches!(self, ProcessOutcome::EmptyInput { .. })
    }
}

/// Output file formats written by the command-line front end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
