//! Core data types shared across loaders, the merge engine and the CLI

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Fields applied when neither the CLI nor a settings file names any.
pub const DEFAULT_CALIBRATION_FIELDS: [&str; 3] =
    ["full_fill_percent", "empty_fill_percent", "brightness_threshold"];

pub const DEFAULT_INDENT: usize = 2;

/// Tool settings, loaded from `calibrate.toml` / `.calibrate.yml` and overridden by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_string_list")]
    pub fields: Vec<String>,
    pub label_column: Option<String>,
    pub pretty: bool,
    pub indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fields: DEFAULT_CALIBRATION_FIELDS.iter().map(|f| f.to_string()).collect(),
            label_column: None,
            pretty: false,
            indent: DEFAULT_INDENT,
        }
    }
}

impl Config {
    pub fn label_column(&self) -> LabelColumn {
        LabelColumn::from_setting(self.label_column.as_deref())
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions { pretty: self.pretty, indent: self.indent }
    }
}

/// Accepts either a list of strings or a single comma-separated string.
fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    let parts = match StringOrList::deserialize(deserializer)? {
        StringOrList::One(s) => s.split(',').map(str::to_string).collect::<Vec<_>>(),
        StringOrList::Many(items) => items,
    };
    Ok(parts.iter().map(|p| p.trim()).filter(|p| !p.is_empty()).map(str::to_string).collect())
}

/// Which CSV column supplies the per-row field name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LabelColumn {
    /// The first column, whatever its header (often empty).
    #[default]
    First,
    /// The column whose trimmed header equals this name. An empty name selects the
    /// unnamed column.
    Named(String),
}

impl LabelColumn {
    pub fn from_setting(setting: Option<&str>) -> Self {
        match setting {
            Some(name) => LabelColumn::Named(name.trim().to_string()),
            None => LabelColumn::First,
        }
    }
}

impl fmt::Display for LabelColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelColumn::First => write!(f, "<first column>"),
            LabelColumn::Named(name) if name.is_empty() => write!(f, "<unnamed column>"),
            LabelColumn::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Field name -> region name -> calibrated value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationTable {
    fields: BTreeMap<String, BTreeMap<String, f64>>,
}

impl CalibrationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `field` even when none of its cells parse, so a labeled row is never lost.
    pub fn ensure_field(&mut self, field: &str) {
        self.fields.entry(field.to_string()).or_default();
    }

    /// Returns the previous value for this cell, if any.
    pub fn insert(&mut self, field: &str, region: &str, value: f64) -> Option<f64> {
        self.fields.entry(field.to_string()).or_default().insert(region.to_string(), value)
    }

    pub fn field(&self, field: &str) -> Option<&BTreeMap<String, f64>> {
        self.fields.get(field)
    }

    pub fn get(&self, field: &str, region: &str) -> Option<f64> {
        self.fields.get(field).and_then(|regions| regions.get(region)).copied()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn region_names(&self) -> BTreeSet<&str> {
        self.fields.values().flat_map(|regions| regions.keys().map(String::as_str)).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.fields.values().map(BTreeMap::len).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub rows_read: usize,
    pub rows_skipped_no_label: usize,
    pub cells_recorded: usize,
    pub cells_skipped: usize,
}

impl TableStats {
    pub fn to_report_value(&self) -> Value {
        json!({
            "rows_read": self.rows_read,
            "rows_skipped": {
                "no_label": self.rows_skipped_no_label,
            },
            "cells_recorded": self.cells_recorded,
            "cells_skipped": self.cells_skipped,
        })
    }
}

/// One overwritten value in one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub region: String,
    pub field: String,
    pub old: Value,
    pub new: Value,
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Updated {}.{}: {} -> {}",
            self.region,
            self.field,
            display_scalar(&self.old),
            display_scalar(&self.new)
        )
    }
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A lookup miss the merge reports to the operator instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeWarning {
    MissingRegions,
    RegionsNotMapping,
    RegionNotMapping { region: String },
    FieldNotInRegion { region: String, field: String },
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeWarning::MissingRegions => {
                write!(f, "No 'regions' section found in configuration")
            }
            MergeWarning::RegionsNotMapping => {
                write!(f, "'regions' section in configuration is not a mapping")
            }
            MergeWarning::RegionNotMapping { region } => {
                write!(f, "Region '{region}' is not a mapping; skipped")
            }
            MergeWarning::FieldNotInRegion { region, field } => {
                write!(f, "Field '{field}' not found in region '{region}'")
            }
        }
    }
}

impl Serialize for MergeWarning {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of applying a calibration table to a document.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub document: Value,
    pub changes: Vec<FieldChange>,
    pub warnings: Vec<MergeWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml` / `.yml` select YAML; anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub pretty: bool,
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { pretty: false, indent: DEFAULT_INDENT }
    }
}
