//! Error types for the ODC admin tools.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur in odc-core operations.
#[derive(Error, Debug)]
pub enum OdcError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Record '{record}' ends on {end} before it starts on {start}")]
    InvalidDateRange {
        record: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Record '{0}' has no start date")]
    MissingDate(String),

    #[error("Validation failed:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for odc-core operations.
pub type OdcResult<T> = Result<T, OdcError>;
