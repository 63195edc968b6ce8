//! # Forecast Math
//!
//! Numeric building blocks shared by the objective forecasting pipeline.
//! This crate knows nothing about months, objectives or sales; it provides
//! plain calculations over `f64` slices:
//!
//! - Arithmetic mean and first differences
//! - Closed-form degree-1 least squares
//! - A bounded Nelder-Mead minimiser for likelihood estimation

use thiserror::Error;

pub mod optimization;
pub mod regression;
pub mod stats;

pub use crate::optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use crate::regression::LinearFit;
pub use crate::stats::{difference, mean};

/// Errors that can occur in forecasting math
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;
