use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Historical dataset '{0}' not found")]
    NotFound(PathBuf),

    #[error("Historical dataset '{path}' has the wrong columns (missing: {missing:?}, unexpected: {unexpected:?})")]
    Schema {
        path: PathBuf,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    // Errors while parsing the CSV file itself
    #[error("Failed to read CSV data from '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    // Should not survive cleaning, reported instead of panicking if it does
    #[error("Missing value in column '{column}' at row {row} after cleaning")]
    MissingValue { column: String, row: usize },
}
