//! Application constants for the property address processor
//!
//! Column names, default property classes, timestamp formats and output
//! naming used throughout the pipeline.

// =============================================================================
// Column Names
// =============================================================================

/// Input and output column names
pub mod columns {
    pub const PROPERTY_CLASS: &str = "Property class";
    pub const ADDRESS: &str = "Address";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const ZIPCODE: &str = "Zipcode";
    pub const SALE_DATE: &str = "Sale date";
    pub const BLOCK_AND_LOT: &str = "Block & Lot";

    /// Derived columns
    pub const FULL_ADDRESS: &str = "Full Address";
    pub const PROCESSED_DATE: &str = "Processed Date";

    /// Columns that must be present before the pipeline runs
    pub const REQUIRED: &[&str] = &[PROPERTY_CLASS, ADDRESS, CITY, STATE, ZIPCODE];
}

// =============================================================================
// Property Classes
// =============================================================================

/// Property classes kept when no whitelist is configured
pub const DEFAULT_PROPERTY_CLASSES: &[&str] =
    &["CD", "B9", "B2", "B3", "CO", "B1", "C1", "A9", "C2"];

// =============================================================================
// Formatting
// =============================================================================

/// Human-readable processing timestamp, e.g. "January 05, 2025 at 03:07 PM"
pub const PROCESSED_DATE_FORMAT: &str = "%B %d, %Y at %I:%M %p";

/// Timestamp embedded in output file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Rendering of a missing cell inside a derived Full Address
pub const MISSING_VALUE_MARKER: &str = "nan";

/// Normalized sale date renderings
pub const SALE_DATE_FORMAT: &str = "%Y-%m-%d";
pub const SALE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Input and Output Files
// =============================================================================

/// Extensions read with the CSV reader
pub const CSV_EXTENSIONS: &[&str] = &["csv"];

/// Extensions read with the spreadsheet reader
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Marker between input stem and timestamp in output file names
pub const PROCESSED_FILE_MARKER: &str = "_processed_";

/// Default directory for processed outputs
pub const DEFAULT_OUTPUT_DIR: &str = "data/outputs";

/// Application directory name under the user config directory
pub const APP_CONFIG_DIR: &str = "property-address-processor";

/// Config file name inside the application config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Rows shown by default in the terminal preview
pub const DEFAULT_PREVIEW_ROWS: usize = 10;
