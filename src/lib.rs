//! Property Address Processor Library
//!
//! A Rust library for cleaning property-sale exports into a list of
//! canonical, de-duplicated street addresses.
//!
//! This library provides tools for:
//! - Loading CSV files and Excel/ODS workbooks as all-text tables
//! - Filtering rows to a whitelist of property class codes
//! - Expanding street-type and directional abbreviations
//! - Keeping only the most recent sale for each Full Address
//! - Writing the result as CSV or Parquet and listing earlier outputs

pub mod config;
pub mod constants;
pub mod dates;
pub mod error;
pub mod history;
pub mod loader;
pub mod models;
pub mod processor;
pub mod standardizer;
pub mod writer;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::ProcessorConfig;
pub use error::{ProcessorError, Result};
pub use models::{OutputFormat, ProcessOutcome, ProcessedData, ProcessingStats};
pub use processor::DataProcessor;
pub use standardizer::AddressStandardizer;
