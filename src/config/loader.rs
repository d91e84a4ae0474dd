//! Settings file loading

use crate::domain::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const SECTION: &str = "calibrate";

const CANDIDATES: [&str; 6] = [
    "calibrate.toml",
    ".calibrate.toml",
    "calibrate.yml",
    ".calibrate.yml",
    "calibrate.yaml",
    ".calibrate.yaml",
];

/// Load tool settings from `settings_path`, or from the first settings file found in
/// `search_dir`. Missing settings yield the defaults.
///
/// An explicitly given file that cannot be parsed is an error. An auto-discovered one
/// is reported as a warning and ignored.
pub fn load_config(search_dir: &Path, settings_path: Option<&Path>) -> Result<Config> {
    let explicit = settings_path.is_some();

    let discovered = match settings_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(search_dir),
    };

    let Some(settings_file) = discovered else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(&settings_file)
        .with_context(|| format!("Failed reading settings file: {}", settings_file.display()))?;

    match parse_config(&content, &settings_file) {
        Ok(cfg) => {
            tracing::debug!("Loaded settings from {}", settings_file.display());
            Ok(cfg)
        }
        Err(e) if explicit => Err(e),
        Err(e) => {
            tracing::warn!(
                "Ignoring auto-discovered settings {}: {:#}",
                settings_file.display(),
                e
            );
            Ok(Config::default())
        }
    }
}

fn parse_config(content: &str, settings_file: &Path) -> Result<Config> {
    let ext =
        settings_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "toml" => parse_toml_config(content, settings_file),
        "yaml" | "yml" => parse_yaml_config(content, settings_file),
        other => anyhow::bail!(
            "Unsupported settings extension '.{}' for file {}",
            other,
            settings_file.display()
        ),
    }
}

/// TOML settings may sit at the top level or under a `[calibrate]` table.
fn parse_toml_config(content: &str, settings_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", settings_file.display()))?;

    let section = raw.get(SECTION).cloned().unwrap_or(raw);

    section
        .try_into()
        .with_context(|| format!("Invalid TOML settings: {}", settings_file.display()))
}

fn parse_yaml_config(content: &str, settings_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", settings_file.display()))?;

    // An empty YAML file parses as null.
    if raw.is_null() {
        return Ok(Config::default());
    }
    let section = raw.get(SECTION).cloned().unwrap_or(raw);

    serde_yaml::from_value(section)
        .with_context(|| format!("Invalid YAML settings: {}", settings_file.display()))
}

fn discover_config(search_dir: &Path) -> Option<PathBuf> {
    CANDIDATES.iter().map(|candidate| search_dir.join(candidate)).find(|path| path.is_file())
}
