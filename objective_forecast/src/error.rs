//! Error types for the objective_forecast crate

use thiserror::Error;

/// Caller-facing errors. Model fitting failures never show up here; they are
/// recovered inside the forecasting model.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Malformed or missing input data
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Fewer usable observations than an operation needs
    #[error("Insufficient data: need at least {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from the numeric layer
    #[error("Math error: {0}")]
    MathError(#[from] forecast_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV decoding
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from JSON decoding or encoding
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl ForecastError {
    /// True for failures caused by the caller's input rather than the
    /// environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ForecastError::ValidationError(_)
                | ForecastError::InsufficientData { .. }
                | ForecastError::InvalidParameter(_)
        )
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::JsonError(err.to_string())
    }
}
