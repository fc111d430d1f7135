//! Error type shared by every stage of a mining query.
//!
//! Parameter and database errors are raised before the search starts;
//! `Cancelled` and `Failed` can only come out of the search itself.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MiningError {
    #[error("Invalid parameter: {0}")]
    Parameter(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cannot read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Task was cancelled by user.")]
    Cancelled,

    #[error("Mining failed: {0}")]
    Failed(String),
}

impl MiningError {
    /// True for errors detected before any search work was done.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MiningError::Parameter(_) | MiningError::Database(_) | MiningError::Io { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MiningError>;

#[cfg(feature = "python")]
impl From<MiningError> for pyo3::PyErr {
    fn from(err: MiningError) -> pyo3::PyErr {
        if err.is_input_error() {
            pyo3::exceptions::PyValueError::new_err(err.to_string())
        } else {
            pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
        }
    }
}
