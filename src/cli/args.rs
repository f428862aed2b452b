//! Command-line argument definitions for the property address processor
//!
//! This module defines the CLI interface using the clap derive API.

use crate::models::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the property address processor
///
/// Filters a property-sale export to whitelisted property classes,
/// standardizes street addresses and removes duplicate addresses.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "property-address-processor",
    version,
    about = "Filter, standardize and deduplicate property-sale address exports",
    long_about = "Processes a property-sale export (CSV or Excel workbook): keeps rows whose \
                  property class is whitelisted, expands street-type and directional \
                  abbreviations, builds a canonical Full Address and keeps only the most \
                  recent sale for each address."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors and critical messages. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress non-essential output"
    )]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process a property-sale export
    Process(ProcessArgs),
    /// List previously processed files, newest first
    History(HistoryArgs),
    /// Standardize one or more addresses and print the result
    Standardize(StandardizeArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Input export (.csv, .xlsx, .xls, .ods)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory receiving the processed file
    ///
    /// Created if it doesn't exist. Defaults to data/outputs.
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Format of the processed file
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Property classes to keep (comma-separated)
    ///
    /// Overrides the configured whitelist. Default: CD,B9,B2,B3,CO,B1,C1,A9,C2
    #[arg(long = "classes", value_name = "LIST", value_delimiter = ',')]
    pub classes: Option<Vec<String>>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// <config dir>/property-address-processor/config.toml
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Rows of Full Address / Processed Date to print after processing
    #[arg(long = "preview", value_name = "ROWS")]
    pub preview: Option<usize>,

    /// Process and report without writing an output file
    #[arg(long = "no-write")]
    pub no_write: bool,
}

/// Arguments for the history command
#[derive(Debug, Clone, Parser)]
pub struct HistoryArgs {
    /// Directory holding processed files. Defaults to data/outputs.
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}

/// Arguments for the standardize command
#[derive(Debug, Clone, Parser)]
pub struct StandardizeArgs {
    /// Addresses to standardize
    #[arg(value_name = "ADDRESS", required = true)]
    pub addresses: Vec<String>,
}

impl Args {
    /// Log level derived from -v / -q
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
