//! Error types for rvv-validator
//!
//! Per-metric problems never surface here; they become bucket records. These
//! variants cover whole-file and process-level failures only.

use thiserror::Error;

/// Validator error type
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// Header row does not match the import format
    #[error("Invalid CSV headers. Expected: {expected:?}, Found: {found:?}")]
    InvalidHeaders {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// No header row at all
    #[error("The CSV file is empty or missing headers.")]
    EmptyFile,

    /// File extension other than `.csv`
    #[error("Invalid file type. Only .csv files are accepted.")]
    UnsupportedFile,

    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog could not be loaded
    #[error("Catalog error: {0}")]
    Common(#[from] rvv_common::Error),

    /// Export template workbook could not be opened, filled or saved
    #[error("Template error: {0}")]
    Template(String),
}

impl ValidatorError {
    /// True for problems with the shape of one input file
    ///
    /// These reject that file only; the rest of a batch proceeds.
    pub fn is_input_shape(&self) -> bool {
        matches!(
            self,
            ValidatorError::InvalidHeaders { .. }
                | ValidatorError::EmptyFile
                | ValidatorError::UnsupportedFile
                | ValidatorError::Csv(_)
        )
    }
}

/// Result type for validator operations
pub type ValidatorResult<T> = Result<T, ValidatorError>;
