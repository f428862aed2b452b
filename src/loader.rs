//! Input loading for CSV files and spreadsheet workbooks.
//!
//! Every loaded column is UTF-8 text so that codes and zipcodes keep
//! their exact spelling (leading zeros included). Empty cells load as
//! nulls.

use crate::constants::{CSV_EXTENSIONS, SPREADSHEET_EXTENSIONS};
use crate::error::{ProcessorError, Result};
use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Load a tabular file into an all-text frame.
///
/// Fails with `EmptyOrInvalidInput` when the file has no columns, no data
/// rows, or cannot be parsed as a table.
pub fn load_table(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(ProcessorError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    let frame = if CSV_EXTENSIONS.contains(&extension.as_str()) {
        load_csv(path)?
    } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        load_spreadsheet(path)?
    } else {
        return Err(ProcessorError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        });
    };

    if frame.width() == 0 {
        return Err(ProcessorError::empty_input(path, "no columns found"));
    }
    if frame.height() == 0 {
        return Err(ProcessorError::empty_input(path, "no data rows found"));
    }

    debug!(
        "Loaded {} rows x {} columns from {}",
        frame.height(),
        frame.width(),
        path.display()
    );

    Ok(frame)
}

/// Read a CSV file with every column as text
fn load_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| ProcessorError::empty_input(path, e.to_string()))
}

/// Read the first worksheet of a workbook; the first row holds column names
fn load_spreadsheet(path: &Path) -> Result<DataFrame> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ProcessorError::empty_input(path, e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ProcessorError::empty_input(path, "workbook has no worksheets"))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ProcessorError::empty_input(path, e.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| ProcessorError::empty_input(path, "worksheet is empty"))?;

    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(index, cell)| match cell_text(cell) {
            Some(name) => name.trim().to_string(),
            None => format!("Unnamed: {}", index),
        })
        .collect();

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for row in rows {
        // Skip rows with no content at all
        if row.iter().all(|cell| cell_text(cell).is_none()) {
            continue;
        }
        for (index, column) in values.iter_mut().enumerate() {
            column.push(row.get(index).and_then(cell_text));
        }
    }

    debug!(
        "Read worksheet '{}' with {} columns from {}",
        sheet_name,
        names.len(),
        path.display()
    );

    let columns: Vec<Column> = names
        .into_iter()
        .zip(values)
        .map(|(name, column)| Series::new(name.into(), column).into())
        .collect();

    DataFrame::new(columns).map_err(|e| ProcessorError::empty_input(path, e.to_string()))
}

/// Text rendering of a worksheet cell; blanks and error cells are missing
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(text) if text.trim().is_empty() => None,
        other => Some(other.to_string()),
    }
}
