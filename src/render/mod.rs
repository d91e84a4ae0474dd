//! Output rendering (change reports)

pub mod report;

pub use report::{build_report, write_report, ReportInputs};
