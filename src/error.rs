//! Error types for loading the salary survey.

use thiserror::Error;

/// Everything that can go wrong while producing a [`Dataset`](crate::data::model::Dataset).
///
/// All variants are fatal for the session: the dashboard does not retry.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error fetching {url}: {message}")]
    Http { url: String, message: String },

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(String),

    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid value '{value}' at row {row}, column '{column}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

impl From<parquet::errors::ParquetError> for LoadError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        LoadError::Parquet(e.to_string())
    }
}

impl From<arrow::error::ArrowError> for LoadError {
    fn from(e: arrow::error::ArrowError) -> Self {
        LoadError::Parquet(e.to_string())
    }
}

/// Result type alias for the data layer.
pub type Result<T> = std::result::Result<T, LoadError>;
