//! Parameters for forecasting and backtesting runs

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Default number of months forecast
pub const DEFAULT_HORIZON: usize = 3;
/// Default number of recent sales points used for the trend projection
pub const DEFAULT_RECENT_WINDOW: usize = 24;
/// Default number of trailing months averaged by the backtest baseline
pub const DEFAULT_BASELINE_WINDOW: usize = 6;

/// Bounded multiplicative calibration applied to raw forecasts.
///
/// These are tuning heuristics, not derived quantities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingConfig {
    /// Weight of the sales/objective ratio deviation from 1
    pub coefficient: f64,
    /// Lower clamp of the multiplier
    pub min_multiplier: f64,
    /// Upper clamp of the multiplier
    pub max_multiplier: f64,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            coefficient: 0.2,
            min_multiplier: 0.9,
            max_multiplier: 1.15,
        }
    }
}

impl ScalingConfig {
    /// Check that the clamp range is well formed
    pub fn validate(&self) -> Result<()> {
        if !self.coefficient.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "Scaling coefficient must be finite".to_string(),
            ));
        }
        if !(self.min_multiplier.is_finite()
            && self.max_multiplier.is_finite()
            && self.min_multiplier <= self.max_multiplier)
        {
            return Err(ForecastError::InvalidParameter(format!(
                "Scaling bounds must satisfy min <= max, got [{}, {}]",
                self.min_multiplier, self.max_multiplier
            )));
        }
        Ok(())
    }
}

/// Settings for a single forecasting call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of future months to forecast
    pub horizon: usize,
    /// Number of most recent sales points used for the sales trend
    pub recent_window: usize,
    /// Post-hoc calibration
    pub scaling: ScalingConfig,
    /// When false the regression fallback is used directly
    pub use_primary_model: bool,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            recent_window: DEFAULT_RECENT_WINDOW,
            scaling: ScalingConfig::default(),
            use_primary_model: true,
        }
    }
}

impl ForecastConfig {
    /// Set the forecast horizon
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the recent sales window
    pub fn with_recent_window(mut self, recent_window: usize) -> Self {
        self.recent_window = recent_window;
        self
    }

    /// Replace the scaling heuristics
    pub fn with_scaling(mut self, scaling: ScalingConfig) -> Self {
        self.scaling = scaling;
        self
    }

    /// Enable or disable the primary regression-with-memory model
    pub fn with_primary_model(mut self, enabled: bool) -> Self {
        self.use_primary_model = enabled;
        self
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        validate_horizon_and_window(self.horizon, self.recent_window)?;
        self.scaling.validate()
    }
}

/// Settings for a rolling-origin backtest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    /// Months forecast at each cutoff
    pub horizon: usize,
    /// Recent sales window passed to the forecaster
    pub recent_window: usize,
    /// Trailing months averaged by the naive baseline
    pub baseline_window: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            recent_window: DEFAULT_RECENT_WINDOW,
            baseline_window: DEFAULT_BASELINE_WINDOW,
        }
    }
}

impl BacktestConfig {
    /// Set the forecast horizon
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the recent sales window
    pub fn with_recent_window(mut self, recent_window: usize) -> Self {
        self.recent_window = recent_window;
        self
    }

    /// Set the baseline moving-average window
    pub fn with_baseline_window(mut self, baseline_window: usize) -> Self {
        self.baseline_window = baseline_window;
        self
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        validate_horizon_and_window(self.horizon, self.recent_window)
    }

    /// Forecast settings used at every cutoff
    pub fn forecast_config(&self) -> ForecastConfig {
        ForecastConfig::default()
            .with_horizon(self.horizon)
            .with_recent_window(self.recent_window)
    }
}

fn validate_horizon_and_window(horizon: usize, recent_window: usize) -> Result<()> {
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "Horizon must be at least 1".to_string(),
        ));
    }
    if recent_window < 2 {
        return Err(ForecastError::InvalidParameter(
            "Recent window must be at least 2".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ForecastConfig::default();
        assert_eq!(config.horizon, 3);
        assert_eq!(config.recent_window, 24);
        assert!(config.use_primary_model);
        assert!(config.validate().is_ok());

        let backtest = BacktestConfig::default();
        assert_eq!(backtest.baseline_window, 6);
        assert_eq!(backtest.forecast_config().horizon, 3);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            ForecastConfig::default().with_horizon(0).validate(),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            BacktestConfig::default().with_recent_window(0).validate(),
            Err(ForecastError::InvalidParameter(_))
        ));
        let inverted = ScalingConfig {
            min_multiplier: 1.2,
            max_multiplier: 1.0,
            ..ScalingConfig::default()
        };
        assert!(ForecastConfig::default()
            .with_scaling(inverted)
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ForecastConfig = serde_json::from_str(r#"{"horizon": 6}"#).unwrap();
        assert_eq!(config.horizon, 6);
        assert_eq!(config.recent_window, 24);
        assert_eq!(config.scaling, ScalingConfig::default());
    }
}
