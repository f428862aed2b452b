//! Address processing pipeline.
//!
//! Orchestrates the complete workflow for one property-sale export:
//! loading, property-class filtering, address standardization,
//! deduplication on the derived Full Address, and timestamping.
//!
//! Each stage takes the table by value and returns a new one, so a failure
//! in any stage discards the whole run.

use crate::config::ProcessorConfig;
use crate::constants::columns;
use crate::dates::{format_sale_date, parse_sale_date};
use crate::error::{ProcessorError, Result};
use crate::loader::load_table;
use crate::models::{ProcessOutcome, ProcessedData, ProcessingStats};
use crate::standardizer::AddressStandardizer;

use chrono::{Local, NaiveDateTime};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Output of the deduplication stage
struct Deduplicated {
    frame: DataFrame,
    unparseable_sale_dates: usize,
}

/// Pipeline over a fixed property-class whitelist
#[derive(Debug, Clone)]
pub struct DataProcessor {
    valid_property_classes: HashSet<String>,
    standardizer: AddressStandardizer,
    config: ProcessorConfig,
}

impl DataProcessor {
    /// Create a processor keeping only the given property classes
    pub fn new<I, S>(valid_property_classes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_config(ProcessorConfig::default().with_property_classes(valid_property_classes))
    }

    /// Create a processor from a full configuration
    pub fn from_config(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;

        let valid_property_classes = config
            .valid_property_classes
            .iter()
            .map(|code| code.trim().to_string())
            .collect();

        Ok(Self {
            valid_property_classes,
            standardizer: AddressStandardizer::new()?,
            config,
        })
    }

    /// Whitelisted property classes in configured order
    pub fn valid_property_classes(&self) -> &[String] {
        &self.config.valid_property_classes
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn standardizer(&self) -> &AddressStandardizer {
        &self.standardizer
    }

    /// Read a CSV file or workbook into an all-text table
    pub fn load(&self, path: &Path) -> Result<DataFrame> {
        load_table(path)
    }

    /// Keep whitelisted property classes and drop the Block & Lot column.
    ///
    /// Codes are trimmed before matching and written back trimmed, so every
    /// retained Property class is a whitelist member as stored.
    pub fn filter(&self, frame: DataFrame) -> Result<DataFrame> {
        let classes: Vec<Option<String>> = text_column(&frame, columns::PROPERTY_CLASS)?
            .into_iter()
            .map(|code| code.map(|code| code.trim().to_string()))
            .collect();
        let mask: BooleanChunked = classes
            .iter()
            .map(|code| {
                code.as_deref()
                    .is_some_and(|code| self.valid_property_classes.contains(code))
            })
            .collect();

        let mut frame = frame;
        frame.with_column(Series::new(columns::PROPERTY_CLASS.into(), classes))?;
        let filtered = frame.filter(&mask)?;
        debug!(
            "Class filter kept {} of {} rows",
            filtered.height(),
            frame.height()
        );

        if filtered.get_column_index(columns::BLOCK_AND_LOT).is_some() {
            debug!("Dropping column '{}'", columns::BLOCK_AND_LOT);
            Ok(filtered.drop(columns::BLOCK_AND_LOT)?)
        } else {
            Ok(filtered)
        }
    }

    /// Standardize Address and derive Full Address.
    ///
    /// Missing Address, City, State or Zipcode cells are rendered with the
    /// configured missing-value marker instead of failing the row.
    pub fn standardize_addresses(&self, frame: DataFrame) -> Result<DataFrame> {
        let addresses = text_column(&frame, columns::ADDRESS)?;
        let cities = text_column(&frame, columns::CITY)?;
        let states = text_column(&frame, columns::STATE)?;
        let zipcodes = text_column(&frame, columns::ZIPCODE)?;
        let marker = self.config.missing_value_marker.as_str();

        let standardized: Vec<Option<String>> = addresses
            .into_iter()
            .map(|address| self.standardizer.standardize_opt(address))
            .collect();

        let mut degraded = 0usize;
        let full_addresses: Vec<String> = standardized
            .iter()
            .zip(cities.into_iter())
            .zip(states.into_iter())
            .zip(zipcodes.into_iter())
            .map(|(((address, city), state), zipcode)| {
                if address.is_none() || city.is_none() || state.is_none() || zipcode.is_none() {
                    degraded += 1;
                }
                format!(
                    "{}, {}, {} {}",
                    address.as_deref().unwrap_or(marker),
                    city.unwrap_or(marker),
                    state.unwrap_or(marker),
                    zipcode.unwrap_or(marker)
                )
            })
            .collect();

        if degraded > 0 {
            warn!(
                "{} rows have missing address components; Full Address uses '{}'",
                degraded, marker
            );
        }

        let mut frame = frame;
        frame.with_column(Series::new(columns::ADDRESS.into(), standardized))?;
        frame.with_column(Series::new(columns::FULL_ADDRESS.into(), full_addresses))?;

        debug!("Standardized {} addresses", frame.height());
        Ok(frame)
    }

    /// Keep one row per Full Address, preferring the most recent sale.
    ///
    /// When a Sale date column exists rows are ordered newest first, with
    /// unparseable dates last, and the output keeps that order.
    pub fn remove_duplicates(&self, frame: DataFrame) -> Result<DataFrame> {
        self.deduplicate(frame).map(|deduplicated| deduplicated.frame)
    }

    fn deduplicate(&self, frame: DataFrame) -> Result<Deduplicated> {
        let keys = text_column(&frame, columns::FULL_ADDRESS)?;
        let mut order: Vec<usize> = (0..frame.height()).collect();
        let mut unparseable_sale_dates = 0usize;
        let mut frame = frame;

        if frame.get_column_index(columns::SALE_DATE).is_some() {
            let raw = text_column(&frame, columns::SALE_DATE)?;
            let parsed: Vec<Option<NaiveDateTime>> = raw
                .into_iter()
                .map(|value| {
                    let parsed = value.and_then(parse_sale_date);
                    if value.is_some() && parsed.is_none() {
                        unparseable_sale_dates += 1;
                    }
                    parsed
                })
                .collect();

            if unparseable_sale_dates > 0 {
                debug!(
                    "{} sale dates could not be parsed and sort as oldest",
                    unparseable_sale_dates
                );
            }

            // Stable sort: newest first, None (unparseable or missing) last
            order.sort_by(|&a, &b| parsed[b].cmp(&parsed[a]));

            let normalized: Vec<Option<String>> = parsed
                .iter()
                .map(|date| date.as_ref().map(format_sale_date))
                .collect();
            frame.with_column(Series::new(columns::SALE_DATE.into(), normalized))?;
        }

        let mut seen = HashSet::new();
        let keep: Vec<IdxSize> = order
            .into_iter()
            .filter(|&row| seen.insert(keys.get(row)))
            .map(|row| row as IdxSize)
            .collect();

        debug!(
            "Deduplication kept {} of {} rows",
            keep.len(),
            frame.height()
        );

        let indices = IdxCa::from_vec("row".into(), keep);
        Ok(Deduplicated {
            frame: frame.take(&indices)?,
            unparseable_sale_dates,
        })
    }

    /// Run every stage after loading on an in-memory table
    pub fn process_frame(&self, frame: DataFrame) -> Result<ProcessedData> {
        let start_time = Instant::now();
        check_required_columns(&frame)?;

        let rows_loaded = frame.height();
        let filtered = self.filter(frame)?;
        let rows_excluded_by_class = rows_loaded - filtered.height();

        let standardized = self.standardize_addresses(filtered)?;
        let rows_before_dedup = standardized.height();

        let Deduplicated {
            frame: mut deduplicated,
            unparseable_sale_dates,
        } = self.deduplicate(standardized)?;
        let duplicates_removed = rows_before_dedup - deduplicated.height();

        // One timestamp for the whole run, taken after the last stage
        let processed_at = Local::now()
            .format(&self.config.processed_date_format)
            .to_string();
        let stamps = vec![processed_at.as_str(); deduplicated.height()];
        deduplicated.with_column(Series::new(columns::PROCESSED_DATE.into(), stamps))?;

        let stats = ProcessingStats {
            rows_loaded,
            rows_excluded_by_class,
            duplicates_removed,
            unparseable_sale_dates,
            rows_output: deduplicated.height(),
            processing_time_ms: start_time.elapsed().as_millis(),
        };

        info!(
            "Processed {} rows: {} excluded by class, {} duplicates removed, {} rows output",
            stats.rows_loaded, stats.rows_excluded_by_class, stats.duplicates_removed, stats.rows_output
        );

        Ok(ProcessedData {
            frame: deduplicated,
            processed_at,
            stats,
        })
    }

    /// Load and process a file, propagating any error
    pub fn try_process(&self, path: &Path) -> Result<ProcessedData> {
        let frame = self.load(path)?;
        self.process_frame(frame)
    }

    /// Load and process a file.
    ///
    /// Never returns an error: failures are logged and reported as a
    /// "no result" outcome carrying a diagnostic message.
    pub fn process(&self, path: &Path) -> ProcessOutcome {
        match self.try_process(path) {
            Ok(data) => ProcessOutcome::Processed(data),
            Err(e) if e.is_empty_input() => {
                error!("Error processing file {}: {}", path.display(), e);
                ProcessOutcome::EmptyInput {
                    diagnostic: e.to_string(),
                }
            }
            Err(e) => {
                error!("Error processing file {}: {}", path.display(), e);
                ProcessOutcome::Failed {
                    diagnostic: e.to_string(),
                }
            }
        }
    }
}

/// Fail when any column the pipeline reads is absent
fn check_required_columns(frame: &DataFrame) -> Result<()> {
    match columns::REQUIRED
        .iter()
        .find(|name| frame.get_column_index(name).is_none())
    {
        Some(name) => Err(ProcessorError::missing_column(*name)),
        None => Ok(()),
    }
}

/// A column rendered as text, whatever its stored type
fn text_column(frame: &DataFrame, name: &str) -> Result<StringChunked> {
    let column = frame
        .column(name)
        .map_err(|_| ProcessorError::missing_column(name))?;
    let series = column.as_materialized_series().cast(&DataType::String)?;
    Ok(series.str()?.clone())
}
