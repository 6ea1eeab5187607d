use std::path::PathBuf;

use thiserror::Error;

/// Failures of loading or writing a parameter file.
///
/// A load is all-or-nothing: it either returns a fully populated parameter
/// set or one of these errors, never a half-filled value.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("parameter file not found or unreadable: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parameter document: {0}")]
    Schema(String),

    /// Only produced when writing.
    #[error("failed to write parameter file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for ParamsError {
    fn from(err: serde_yaml::Error) -> Self {
        ParamsError::Schema(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ParamsError>;
