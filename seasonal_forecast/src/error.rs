//! Error types for the seasonal_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the seasonal_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The weather or yield table does not exist on disk
    #[error("Dataset not found: {0}")]
    MissingDataset(String),

    /// A required column is absent from a loaded table
    #[error("Column '{column}' not found in {table}")]
    MissingColumn { table: String, column: String },

    /// The weather table has no rows for the selected district
    #[error("No data found for district: {0}")]
    EmptyDistrictData(String),

    /// One or more seasons have none of their source columns in the table
    #[error("No source columns present for season(s): {}", .0.join(", "))]
    MissingSeasonColumns(Vec<String>),

    /// No persisted model exists for the district
    #[error("Prediction model not found for {district} (looked in {path})")]
    ModelNotFound { district: String, path: String },

    /// Assembled exogenous columns differ from what the model was fit with
    #[error("Exogenous variable mismatch! Model expects: {expected:?}, supplied: {supplied:?}")]
    ExogenousShapeMismatch {
        expected: Vec<String>,
        supplied: Vec<String>,
    },

    /// The fitted model failed to produce a usable forecast
    #[error("Prediction error: {0}")]
    ForecastFailure(String),

    /// The estimator could not fit a model
    #[error("Fitting failed: {0}")]
    FittingFailure(String),

    /// Fewer rows than the operation needs
    #[error("Insufficient data: need {needed} rows, have {available}")]
    InsufficientData { needed: usize, available: usize },

    /// A cell inside the exogenous window is missing
    #[error("Incomplete exogenous data: {0}")]
    IncompleteExogenous(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// District name cannot be used as a model file key
    #[error("Invalid district name for model lookup: {0:?}")]
    InvalidDistrictName(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error reading or writing model artifacts
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Error writing CSV reports
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error loading settings
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
