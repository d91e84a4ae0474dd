//! Calibration table loading
//!
//! The CSV header names the regions; one column (the label column) names the
//! calibration field each row carries. Cells that do not hold a finite number are
//! skipped, as are rows without a label.

use crate::domain::{CalibrationTable, LabelColumn, TableStats};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn load_calibration_table(
    path: &Path,
    label_column: &LabelColumn,
) -> Result<(CalibrationTable, TableStats)> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let (table, stats) = parse_calibration_table(file, label_column, path)?;
    tracing::debug!(
        "Loaded calibration table {}: {} fields, {} cells",
        path.display(),
        table.len(),
        table.cell_count()
    );
    Ok((table, stats))
}

/// Parse a calibration table from any reader. `source` is only used in error messages.
pub fn parse_calibration_table<R: Read>(
    reader: R,
    label_column: &LabelColumn,
    source: &Path,
) -> Result<(CalibrationTable, TableStats)> {
    let mut csv_reader =
        csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| csv_error(source, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        tracing::warn!("Calibration table {} is empty", source.display());
        return Ok((CalibrationTable::new(), TableStats::default()));
    }

    let label_idx = resolve_label_column(&headers, label_column, source)?;

    let mut table = CalibrationTable::new();
    let mut stats = TableStats::default();

    for record in csv_reader.records() {
        let record = record.map_err(|e| csv_error(source, e))?;
        stats.rows_read += 1;

        let label = record.get(label_idx).map(str::trim).unwrap_or("");
        if label.is_empty() {
            stats.rows_skipped_no_label += 1;
            tracing::debug!("Skipping calibration row {} without a label", stats.rows_read);
            continue;
        }

        if table.contains_field(label) {
            tracing::warn!("Calibration field '{}' appears on more than one row", label);
        }
        table.ensure_field(label);

        for (idx, region) in headers.iter().enumerate() {
            if idx == label_idx || region.is_empty() {
                continue;
            }
            let cell = record.get(idx).unwrap_or("");
            match parse_numeric_cell(cell) {
                Some(value) => {
                    table.insert(label, region, value);
                    stats.cells_recorded += 1;
                }
                None => {
                    stats.cells_skipped += 1;
                    if !cell.trim().is_empty() {
                        tracing::debug!(
                            "Skipping non-numeric calibration value {:?} for {}.{}",
                            cell,
                            region,
                            label
                        );
                    }
                }
            }
        }
    }

    Ok((table, stats))
}

/// Parse a calibration cell as a finite number, or `None` if it is empty or not numeric.
pub fn parse_numeric_cell(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn resolve_label_column(
    headers: &[String],
    label_column: &LabelColumn,
    source: &Path,
) -> Result<usize> {
    match label_column {
        LabelColumn::First => Ok(0),
        LabelColumn::Named(name) => headers.iter().position(|h| h == name).ok_or_else(|| {
            Error::LabelColumn { column: name.clone(), path: source.to_path_buf() }
        }),
    }
}

fn csv_error(source: &Path, err: csv::Error) -> Error {
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => Error::io(source, e),
        _ => Error::parse(source, message),
    }
}
