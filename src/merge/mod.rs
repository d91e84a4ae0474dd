//! Merge engine: writes selected calibration values into the regions of a document
//!
//! The input document is cloned before any change, so callers keep their original
//! tree intact. Existing region fields are overwritten; fields a region does not
//! already carry are never introduced.

use crate::domain::{CalibrationTable, FieldChange, MergeOutcome, MergeWarning};
use serde_json::{Number, Value};
use std::collections::HashSet;

pub const REGIONS_KEY: &str = "regions";

pub fn apply_calibration(
    document: &Value,
    table: &CalibrationTable,
    fields: &[String],
) -> MergeOutcome {
    let mut updated = document.clone();
    let mut changes = Vec::new();
    let mut warnings = Vec::new();

    let selected = dedup_fields(fields);

    let regions = match updated.get_mut(REGIONS_KEY) {
        None => {
            warn(&mut warnings, MergeWarning::MissingRegions);
            return MergeOutcome { document: updated, changes, warnings };
        }
        Some(Value::Object(regions)) => regions,
        Some(_) => {
            warn(&mut warnings, MergeWarning::RegionsNotMapping);
            return MergeOutcome { document: updated, changes, warnings };
        }
    };

    for (region_name, region_config) in regions.iter_mut() {
        let Some(region_config) = region_config.as_object_mut() else {
            warn(&mut warnings, MergeWarning::RegionNotMapping { region: region_name.clone() });
            continue;
        };

        for field in &selected {
            let Some(field_values) = table.field(field) else {
                tracing::debug!("No calibration data for field '{}'", field);
                continue;
            };
            let Some(&new_value) = field_values.get(region_name) else {
                tracing::debug!("No calibration value for {}.{}", region_name, field);
                continue;
            };
            let Some(slot) = region_config.get_mut(*field) else {
                warn(
                    &mut warnings,
                    MergeWarning::FieldNotInRegion {
                        region: region_name.clone(),
                        field: field.to_string(),
                    },
                );
                continue;
            };

            // Only finite values reach the table, so from_f64 always succeeds.
            let Some(new_value) = Number::from_f64(new_value).map(Value::Number) else {
                continue;
            };
            if *slot == new_value {
                continue;
            }

            let old_value = std::mem::replace(slot, new_value.clone());
            changes.push(FieldChange {
                region: region_name.clone(),
                field: field.to_string(),
                old: old_value,
                new: new_value,
            });
        }
    }

    MergeOutcome { document: updated, changes, warnings }
}

/// Selector order is kept; later duplicates are dropped.
fn dedup_fields(fields: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    fields.iter().map(String::as_str).filter(|f| seen.insert(*f)).collect()
}

fn warn(warnings: &mut Vec<MergeWarning>, warning: MergeWarning) {
    tracing::warn!("{}", warning);
    warnings.push(warning);
}
