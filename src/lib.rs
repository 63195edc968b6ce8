//! # Objective Forecast Workspace
//!
//! Facade over the workspace crates: `objective_forecast` for the
//! forecasting pipeline and backtest, `forecast_math` for the numeric
//! building blocks underneath.
//!
//! ## Example
//!
//! ```
//! use objective_forecast_workspace::{predict, ForecastConfig, SeriesInput};
//!
//! let input = SeriesInput::Arrays {
//!     objectives: vec![10.0, 12.0, 14.0, 16.0],
//!     sales: vec![100.0, 110.0, 120.0, 130.0],
//! };
//! let output = predict(&input, &ForecastConfig::default()).unwrap();
//! assert_eq!(output.predictions.len(), 3);
//! assert!(output.timeline.is_none());
//! ```

pub use forecast_math;
pub use objective_forecast::{
    backtest, predict, BacktestConfig, BacktestResult, ForecastConfig, ForecastError,
    ForecastOutput, MonthlyRecord, SeriesInput, TimelineEntry,
};
