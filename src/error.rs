//! Error handling for address processing operations.
//!
//! Provides error types with context for input loading, column
//! validation, configuration and output failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Input file is empty or invalid: {path} - {reason}")]
    EmptyOrInvalidInput { path: PathBuf, reason: String },

    #[error("Missing expected column: '{column}'")]
    MissingExpectedColumn { column: String },

    #[error("Unsupported input format '{extension}' for file: {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to write output to {path}: {reason}")]
    OutputFailed { path: PathBuf, reason: String },
}

impl ProcessorError {
    /// Create an empty-or-invalid input error
    pub fn empty_input(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::EmptyOrInvalidInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing column error
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingExpectedColumn {
            column: column.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True when the input itself had nothing usable in it
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyOrInvalidInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
