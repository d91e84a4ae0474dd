//! Shared CLI utilities.

use anyhow::Result;
use std::path::Path;

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::Config;

/// Flatten `--fields` values, splitting each on commas, trimming whitespace and
/// discarding empty segments.
pub fn split_field_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}

/// Fail with a descriptive message when an input file does not exist.
pub fn require_file(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("{} file not found: {}", what, path.display());
    }
    if !path.is_file() {
        anyhow::bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}

/// Settings from `--settings` or the current directory, with CLI values on top.
pub fn resolve_config(settings: Option<&Path>, overrides: CliOverrides) -> Result<Config> {
    let search_dir = std::env::current_dir()?;
    let config = load_config(&search_dir, settings)?;
    Ok(merge_cli_with_config(config, overrides))
}
