//! Apply command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::{require_file, resolve_config, split_field_list};
use crate::config::CliOverrides;
use crate::document::{load_document, write_document};
use crate::merge::apply_calibration;
use crate::render::{write_report, ReportInputs};
use crate::table::load_calibration_table;

#[derive(Args)]
pub struct ApplyArgs {
    /// Path to the existing configuration document (JSON, or YAML by extension)
    #[arg(short = 'c', long, value_name = "FILE", default_value = "config.json")]
    pub config: PathBuf,

    /// Path to the calibration CSV file
    #[arg(short = 'k', long, value_name = "FILE", default_value = "calibration.csv")]
    pub calibration: PathBuf,

    /// Path for the updated configuration document
    #[arg(short = 'o', long, value_name = "FILE", default_value = "output.json")]
    pub output: PathBuf,

    /// Calibration fields to update, space or comma separated
    /// [default: full_fill_percent empty_fill_percent brightness_threshold]
    #[arg(
        short = 'f',
        long,
        visible_alias = "calibration-fields",
        value_name = "FIELD",
        num_args = 1..
    )]
    pub fields: Vec<String>,

    /// CSV column holding the field names (default: the first column)
    #[arg(long, value_name = "NAME")]
    pub label_column: Option<String>,

    /// Pretty-print the output document
    #[arg(long)]
    pub pretty: bool,

    /// Indentation width for --pretty
    #[arg(long, value_name = "N")]
    pub indent: Option<usize>,

    /// Settings file (calibrate.toml or .calibrate.yml)
    #[arg(short = 's', long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Also write a JSON report of changes and warnings
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Omit the generation timestamp from the report
    #[arg(long)]
    pub no_timestamp: bool,

    /// Show the changes without writing the output document
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: ApplyArgs) -> Result<()> {
    require_file(&args.config, "Configuration")?;
    require_file(&args.calibration, "Calibration")?;

    let config = resolve_config(
        args.settings.as_deref(),
        CliOverrides {
            fields: split_field_list(&args.fields),
            label_column: args.label_column.clone(),
            pretty: args.pretty,
            indent: args.indent,
        },
    )?;

    let document = load_document(&args.config).context("Error reading configuration")?;
    let (table, stats) = load_calibration_table(&args.calibration, &config.label_column())
        .context("Error reading calibration data")?;

    let outcome = apply_calibration(&document, &table, &config.fields);

    for change in &outcome.changes {
        println!("{}", change);
    }

    if args.dry_run {
        println!(
            "Dry run: {} value(s) would change; {} not written",
            outcome.changes.len(),
            args.output.display()
        );
    } else {
        write_document(&outcome.document, &args.output, config.write_options())
            .context("Error writing output file")?;
        println!("Successfully wrote updated configuration to {}", args.output.display());
    }

    if let Some(report_path) = &args.report {
        let inputs = ReportInputs {
            config_path: &args.config,
            calibration_path: &args.calibration,
            output_path: (!args.dry_run).then_some(args.output.as_path()),
            fields: &config.fields,
        };
        write_report(
            report_path,
            &inputs,
            &stats,
            &outcome.changes,
            &outcome.warnings,
            !args.no_timestamp,
        )
        .with_context(|| format!("Error writing report: {}", report_path.display()))?;
    }

    Ok(())
}
