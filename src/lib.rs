//! calibrate-config: apply calibration measurements to machine configuration documents
//!
//! Reads a configuration document (JSON or YAML) and a CSV calibration table whose
//! header names regions and whose rows name calibration fields, then writes a copy of
//! the document with the selected fields of each region overwritten.

pub mod cli;
pub mod config;
pub mod document;
pub mod domain;
pub mod error;
pub mod merge;
pub mod render;
pub mod table;

pub use domain::{CalibrationTable, Config, FieldChange, LabelColumn, MergeOutcome, MergeWarning};
pub use error::{Error, Result};
pub use merge::apply_calibration;
