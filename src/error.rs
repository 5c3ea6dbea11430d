//! Error types for dataset validation and detector execution

use crate::types::Column;
use thiserror::Error;

/// Errors surfaced by the detection engine
#[derive(Debug, Error)]
pub enum DetectionError {
    /// A column value could not be parsed or is out of range
    #[error("invalid value in column '{column}': {value:?}")]
    InvalidValue { column: Column, value: String },

    /// A row lacks a value in a column the rest of the dataset carries
    #[error("missing value in column '{column}' at row {row}")]
    MissingValue { column: Column, row: usize },

    #[error("detector '{detector}' failed: {reason}")]
    DetectorFailed { detector: String, reason: String },

    #[error("detector '{detector}' exceeded its {timeout_ms}ms budget")]
    DetectorTimeout { detector: String, timeout_ms: u64 },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DetectionError>;
