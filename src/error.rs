//! Error types for loading and writing documents and calibration tables

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed accessing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed parsing {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Label column '{column}' not found in header of {}", path.display())]
    LabelColumn { column: String, path: PathBuf },
}

impl Error {
    pub fn io(path: &Path, source: io::Error) -> Self {
        Error::Io { path: path.to_path_buf(), source }
    }

    pub fn parse(path: &Path, message: impl ToString) -> Self {
        Error::Parse { path: path.to_path_buf(), message: message.to_string() }
    }
}
