//! Info command implementation

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

use super::utils::{require_file, resolve_config, split_field_list};
use crate::config::CliOverrides;
use crate::document::load_document;
use crate::domain::CalibrationTable;
use crate::merge::{apply_calibration, REGIONS_KEY};
use crate::table::load_calibration_table;

#[derive(Args)]
pub struct InfoArgs {
    /// Path to the configuration document
    #[arg(short = 'c', long, value_name = "FILE", default_value = "config.json")]
    pub config: PathBuf,

    /// Path to the calibration CSV file
    #[arg(short = 'k', long, value_name = "FILE", default_value = "calibration.csv")]
    pub calibration: PathBuf,

    /// Calibration fields to consider, space or comma separated
    #[arg(short = 'f', long, value_name = "FIELD", num_args = 1..)]
    pub fields: Vec<String>,

    /// CSV column holding the field names (default: the first column)
    #[arg(long, value_name = "NAME")]
    pub label_column: Option<String>,

    /// Settings file (calibrate.toml or .calibrate.yml)
    #[arg(short = 's', long, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

pub fn run(args: InfoArgs) -> Result<()> {
    require_file(&args.config, "Configuration")?;
    require_file(&args.calibration, "Calibration")?;

    let config = resolve_config(
        args.settings.as_deref(),
        CliOverrides {
            fields: split_field_list(&args.fields),
            label_column: args.label_column.clone(),
            ..CliOverrides::default()
        },
    )?;

    let document = load_document(&args.config).context("Error reading configuration")?;
    let label_column = config.label_column();
    let (table, stats) = load_calibration_table(&args.calibration, &label_column)
        .context("Error reading calibration data")?;

    println!("Configuration: {}", args.config.display());
    match document.get(REGIONS_KEY).and_then(Value::as_object) {
        Some(regions) => {
            let names: Vec<&str> = regions.keys().map(String::as_str).collect();
            println!("  Regions ({}): {}", names.len(), names.join(", "));
        }
        None => println!("  Regions: none"),
    }

    println!("Calibration table: {}", args.calibration.display());
    println!("  Label column: {}", label_column);
    let fields: Vec<&str> = table.field_names().collect();
    println!("  Fields ({}): {}", fields.len(), fields.join(", "));
    let regions: Vec<&str> = table.region_names().into_iter().collect();
    println!("  Regions ({}): {}", regions.len(), regions.join(", "));
    println!("  Rows read: {}", stats.rows_read);
    println!("  Rows skipped (no label): {}", stats.rows_skipped_no_label);
    println!("  Cells recorded: {}", stats.cells_recorded);
    println!("  Cells skipped: {}", stats.cells_skipped);

    println!("Selected fields:");
    for field in &config.fields {
        let in_table = table.field(field).map(|r| r.len()).unwrap_or(0);
        println!(
            "  {}: {} value(s) in table, {} applicable",
            field,
            in_table,
            applicable_regions(&document, &table, field)
        );
    }

    let outcome = apply_calibration(&document, &table, &config.fields);
    println!("Pending changes: {}", outcome.changes.len());

    Ok(())
}

/// Regions that carry `field` and have a table value for it.
fn applicable_regions(document: &Value, table: &CalibrationTable, field: &str) -> usize {
    let Some(regions) = document.get(REGIONS_KEY).and_then(Value::as_object) else {
        return 0;
    };
    regions
        .iter()
        .filter(|(name, cfg)| {
            cfg.as_object().is_some_and(|c| c.contains_key(field))
                && table.get(field, name).is_some()
        })
        .count()
}
