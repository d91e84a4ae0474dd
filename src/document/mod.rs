//! Configuration document loading and writing
//!
//! Documents are held as `serde_json::Value` trees with key order preserved, whether
//! they were read from JSON or YAML.

use crate::domain::{DocumentFormat, WriteOptions};
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub fn load_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let document = parse_document(&content, DocumentFormat::from_path(path))
        .map_err(|message| Error::parse(path, message))?;
    tracing::debug!("Loaded configuration document {}", path.display());
    Ok(document)
}

pub fn parse_document(content: &str, format: DocumentFormat) -> std::result::Result<Value, String> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    }
}

pub fn render_document(
    document: &Value,
    format: DocumentFormat,
    options: WriteOptions,
) -> std::result::Result<String, String> {
    match format {
        DocumentFormat::Json if options.pretty => {
            let indent = " ".repeat(options.indent);
            let mut buf = Vec::new();
            let formatter = PrettyFormatter::with_indent(indent.as_bytes());
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            document.serialize(&mut ser).map_err(|e| e.to_string())?;
            String::from_utf8(buf).map_err(|e| e.to_string())
        }
        DocumentFormat::Json => serde_json::to_string(document).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => serde_yaml::to_string(document).map_err(|e| e.to_string()),
    }
}

pub fn write_document(document: &Value, path: &Path, options: WriteOptions) -> Result<()> {
    let rendered = render_document(document, DocumentFormat::from_path(path), options)
        .map_err(|message| Error::parse(path, message))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, rendered).map_err(|e| Error::io(path, e))?;
    tracing::debug!("Wrote configuration document {}", path.display());
    Ok(())
}
