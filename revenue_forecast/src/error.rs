//! Error types for the revenue_forecast crate

use polars::prelude::PolarsError;
use series_math::MathError;
use thiserror::Error;

/// Custom error types for the revenue_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// No column matches the requested canonical name
    #[error("Missing column: no column matching '{0}' found in the dataset")]
    MissingColumn(String),

    /// More than one column matches the requested canonical name
    #[error("Ambiguous column: '{canonical}' matches {candidates:?}")]
    AmbiguousColumn {
        canonical: String,
        candidates: Vec<String>,
    },

    /// A month cell could not be parsed as a calendar date
    #[error("Date parse error at row {row}: '{value}' is not a recognised date")]
    DateParse { row: usize, value: String },

    /// A revenue cell could not be parsed as a number
    #[error("Numeric parse error at row {row}: '{value}' is not a number")]
    NumericParse { row: usize, value: String },

    /// The series is degenerate or no model could be estimated
    #[error("Model fit error: {0}")]
    ModelFit(String),

    /// Predicted values and generated dates disagree in length
    #[error("Length mismatch: expected {expected} forecast values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error while reading or validating configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while writing CSV output
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error from the numeric kernels
    #[error("Math error: {0}")]
    MathError(#[from] MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::Config(err.to_string())
    }
}
