//! Change report JSON generation.

use crate::domain::{FieldChange, MergeWarning, TableStats, REPORT_SCHEMA_VERSION};
use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::path::Path;

pub struct ReportInputs<'a> {
    pub config_path: &'a Path,
    pub calibration_path: &'a Path,
    pub output_path: Option<&'a Path>,
    pub fields: &'a [String],
}

pub fn build_report(
    inputs: &ReportInputs<'_>,
    stats: &TableStats,
    changes: &[FieldChange],
    warnings: &[MergeWarning],
    include_timestamp: bool,
) -> Result<Value> {
    let mut report = Map::new();
    report.insert("schema_version".to_string(), Value::String(REPORT_SCHEMA_VERSION.to_string()));
    if include_timestamp {
        report.insert(
            "generated_at".to_string(),
            Value::String(Utc::now().format("%Y-%m-%dT%H:%M:%S+00:00").to_string()),
        );
    }
    report.insert(
        "inputs".to_string(),
        json!({
            "config": inputs.config_path.display().to_string(),
            "calibration": inputs.calibration_path.display().to_string(),
            "output": inputs.output_path.map(|p| p.display().to_string()),
        }),
    );
    report.insert("fields".to_string(), serde_json::to_value(inputs.fields)?);
    report.insert("table".to_string(), stats.to_report_value());
    report.insert("changes".to_string(), serde_json::to_value(changes)?);
    report.insert("warnings".to_string(), serde_json::to_value(warnings)?);
    Ok(Value::Object(report))
}

pub fn write_report(
    report_path: &Path,
    inputs: &ReportInputs<'_>,
    stats: &TableStats,
    changes: &[FieldChange],
    warnings: &[MergeWarning],
    include_timestamp: bool,
) -> Result<()> {
    let report = build_report(inputs, stats, changes, warnings, include_timestamp)?;

    if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating report directory: {}", parent.display()))?;
    }
    std::fs::write(report_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("Failed writing report: {}", report_path.display()))?;
    Ok(())
}
