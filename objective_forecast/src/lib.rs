//! # Objective Forecast
//!
//! Forecasts the next few monthly values of a target quantity (the
//! "objective") from its own history and a correlated sales series, and
//! measures that forecast with a rolling-origin backtest.
//!
//! ## Pipeline
//!
//! 1. **Preparation**: dated monthly records or legacy parallel arrays become
//!    an aligned `(objectives, sales)` pair plus the month of the last record
//! 2. **Sales projection**: a straight line through the recent sales window
//! 3. **Objective model**: ARIMAX(1,1,1) conditioned on projected sales, with
//!    a least-squares fallback whenever the fit fails
//! 4. **Calibration**: a bounded multiplier from the sales/objective ratio
//! 5. **Timeline**: rounded predictions dated from the last known month
//!
//! ## Quick Start
//!
//! ```rust
//! use objective_forecast::{predict, ForecastConfig, MonthlyRecord, SeriesInput};
//!
//! let months: Vec<MonthlyRecord> = (1..=12)
//!     .map(|m| MonthlyRecord::new(2023, m, 100.0 + 5.0 * m as f64, 500.0 + 20.0 * m as f64))
//!     .collect();
//!
//! let output = predict(&SeriesInput::Months(months), &ForecastConfig::default())?;
//! assert_eq!(output.predictions.len(), 3);
//! assert_eq!(output.timeline.unwrap()[0].year, 2024);
//! # Ok::<(), objective_forecast::ForecastError>(())
//! ```

pub mod backtest;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod scaling;
pub mod timeline;

// Re-export commonly used types
pub use crate::backtest::{backtest, BacktestEvaluator, BacktestResult, BacktestWindow};
pub use crate::config::{BacktestConfig, ForecastConfig, ScalingConfig};
pub use crate::data::{prepare_series, MonthlyRecord, PreparedSeries, SeriesInput};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{ForecastPath, ObjectiveForecast, ObjectiveForecastModel};
pub use crate::pipeline::{predict, predict_detailed, DetailedForecast, ForecastOutput};
pub use crate::scaling::ScalingAdjuster;
pub use crate::timeline::{build_timeline, TimelineEntry, YearMonth};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
