//! Configuration management and validation.
//!
//! Provides the pipeline configuration (property-class whitelist,
//! timestamp format, missing-value rendering) and the output settings used
//! by the command-line front end. Configuration can be read from a TOML
//! file and is then overridden by command-line flags.

use crate::constants::{
    APP_CONFIG_DIR, CONFIG_FILE_NAME, DEFAULT_OUTPUT_DIR, DEFAULT_PREVIEW_ROWS,
    DEFAULT_PROPERTY_CLASSES, MISSING_VALUE_MARKER, PROCESSED_DATE_FORMAT,
};
use crate::error::{ProcessorError, Result};
use crate::models::OutputFormat;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Output settings for processed tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving processed files
    pub directory: PathBuf,

    /// File format of processed files
    pub format: OutputFormat,

    /// Rows shown in the terminal preview after a run
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: OutputFormat::Csv,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// Main configuration for the address pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Property class codes that survive filtering, in declared order
    pub valid_property_classes: Vec<String>,

    /// chrono format string for the Processed Date column
    pub processed_date_format: String,

    /// Rendering of missing City/State/Zipcode cells inside Full Address
    pub missing_value_marker: String,

    pub output: OutputConfig,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            valid_property_classes: DEFAULT_PROPERTY_CLASSES
                .iter()
                .map(|code| code.to_string())
                .collect(),
            processed_date_format: PROCESSED_DATE_FORMAT.to_string(),
            missing_value_marker: MISSING_VALUE_MARKER.to_string(),
            output: OutputConfig::default(),
        }
    }
}

impl ProcessorConfig {
    /// Replace the property-class whitelist
    pub fn with_property_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_property_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the Processed Date format
    pub fn with_processed_date_format(mut self, format: impl Into<String>) -> Self {
        self.processed_date_format = format.into();
        self
    }

    /// Set the missing-value marker
    pub fn with_missing_value_marker(mut self, marker: impl Into<String>) -> Self {
        self.missing_value_marker = marker.into();
        self
    }

    /// Set the output directory
    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output.directory = directory.into();
        self
    }

    /// Set the output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output.format = format;
        self
    }

    /// Set the number of preview rows
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.output.preview_rows = rows;
        self
    }

    /// Read configuration from a TOML file; absent keys keep their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ProcessorError::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: ProcessorConfig = toml::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from an explicit file, else the default location if present, else defaults
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_file {
            return Self::from_toml_file(path);
        }

        match Self::default_config_path() {
            Some(path) if path.exists() => Self::from_toml_file(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Default config file location under the user config directory
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.valid_property_classes.is_empty() {
            return Err(ProcessorError::configuration(
                "At least one valid property class is required",
            ));
        }

        if let Some(code) = self
            .valid_property_classes
            .iter()
            .find(|code| code.trim().is_empty())
        {
            return Err(ProcessorError::configuration(format!(
                "Property class codes must not be blank, found {:?}",
                code
            )));
        }

        if self.processed_date_format.trim().is_empty()
            || StrftimeItems::new(&self.processed_date_format).any(|item| matches!(item, Item::Error))
        {
            return Err(ProcessorError::configuration(format!(
                "Invalid processed date format: {:?}",
                self.processed_date_format
            )));
        }

        if self.output.preview_rows > 1000 {
            return Err(ProcessorError::configuration(
                "preview_rows must not exceed 1000",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProcessorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.valid_property_classes.len(), 9);
        assert_eq!(config.valid_property_classes[0], "CD");
        assert_eq!(config.output.directory, PathBuf::from("data/outputs"));
    }

    #[test]
    fn test_builder_methods() {
        let config = ProcessorConfig::default()
            .with_property_classes(["CD", "B2"])
            .with_missing_value_marker("?")
            .with_output_format(OutputFormat::Parquet)
            .with_preview_rows(3);

        assert_eq!(config.valid_property_classes, vec!["CD", "B2"]);
        assert_eq!(config.missing_value_marker, "?");
        assert_eq!(config.output.format, OutputFormat::Parquet);
        assert_eq!(config.output.preview_rows, 3);
    }

    #[test]
    fn test_validation_failures() {
        let empty = ProcessorConfig::default().with_property_classes(Vec::<String>::new());
        assert!(empty.validate().is_err());

        let blank = ProcessorConfig::default().with_property_classes(["CD", " "]);
        assert!(blank.validate().is_err());

        let bad_format = ProcessorConfig::default().with_processed_date_format("%Q");
        assert!(bad_format.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "valid_property_classes = [\"CD\", \"CO\"]").unwrap();
        writeln!(file, "[output]").unwrap();
        writeln!(file, "format = \"parquet\"").unwrap();

        let config = ProcessorConfig::from_toml_file(file.path()).unwrap();

        assert_eq!(config.valid_property_classes, vec!["CD", "CO"]);
        assert_eq!(config.output.format, OutputFormat::Parquet);
        assert_eq!(config.output.directory, PathBuf::from("data/outputs"));
        assert_eq!(config.processed_date_format, PROCESSED_DATE_FORMAT);
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "valid_property_classes = 5").unwrap();

        let err = ProcessorConfig::from_toml_file(file.path()).unwrap_err();
        assert!(matches!(err, ProcessorError::Toml(_)));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = ProcessorConfig::load(Some(Path::new("missing/config.toml"))).unwrap_err();
        assert!(matches!(err, ProcessorError::Configuration { .. }));
    }
}
