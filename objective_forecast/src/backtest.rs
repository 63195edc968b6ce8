//! Rolling-origin evaluation of the forecasting pipeline
//!
//! Every cutoff trains on all months up to and including the cutoff and scores
//! the next `horizon` months, both for the full pipeline and for a naive
//! moving-average baseline. Errors are pooled across all windows before the
//! summary metrics are taken.

use crate::config::BacktestConfig;
use crate::data::{MonthlyRecord, SeriesInput};
use crate::error::Result;
use crate::metrics::{mean_absolute_error, mean_absolute_percentage_error};
use crate::pipeline::predict;
use log::{info, trace};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Fewest records for which a backtest is attempted
pub const MIN_BACKTEST_RECORDS: usize = 3;

/// One evaluated cutoff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestWindow {
    pub cutoff_year: i32,
    pub cutoff_month: u32,
    pub predictions: Vec<f64>,
    pub actuals: Vec<f64>,
    /// `actual - predicted` for the model
    pub errors: Vec<f64>,
    pub baseline_predictions: Vec<f64>,
}

/// Pooled accuracy of the model and the baseline.
///
/// Metrics are `None` when they could not be computed, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub model_mae: Option<f64>,
    pub model_mape: Option<f64>,
    pub baseline_mae: Option<f64>,
    pub baseline_mape: Option<f64>,
    pub n_tests: usize,
    pub details: Vec<BacktestWindow>,
}

impl BacktestResult {
    fn empty() -> Self {
        Self {
            model_mae: None,
            model_mape: None,
            baseline_mae: None,
            baseline_mape: None,
            n_tests: 0,
            details: Vec::new(),
        }
    }

    fn from_windows(details: Vec<BacktestWindow>) -> Self {
        if details.is_empty() {
            return Self::empty();
        }

        let actuals: Vec<f64> = details.iter().flat_map(|w| w.actuals.iter().copied()).collect();
        let model: Vec<f64> = details
            .iter()
            .flat_map(|w| w.predictions.iter().copied())
            .collect();
        let baseline: Vec<f64> = details
            .iter()
            .flat_map(|w| w.baseline_predictions.iter().copied())
            .collect();

        Self {
            model_mae: mean_absolute_error(&actuals, &model),
            model_mape: mean_absolute_percentage_error(&actuals, &model),
            baseline_mae: mean_absolute_error(&actuals, &baseline),
            baseline_mape: mean_absolute_percentage_error(&actuals, &baseline),
            n_tests: details.len(),
            details,
        }
    }
}

/// Walk-forward evaluator
#[derive(Debug, Clone, Default)]
pub struct BacktestEvaluator {
    config: BacktestConfig,
}

impl BacktestEvaluator {
    pub fn new(config: BacktestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Evaluate every cutoff in chronological order.
    ///
    /// Cutoffs whose forecast fails are skipped and not counted.
    pub fn evaluate(&self, records: &[MonthlyRecord]) -> BacktestResult {
        if records.len() < MIN_BACKTEST_RECORDS {
            return BacktestResult::empty();
        }

        let mut sorted = records.to_vec();
        sorted.sort_by_key(MonthlyRecord::period);

        let horizon = self.config.horizon;
        let last_cutoff = sorted.len().saturating_sub(horizon);
        let details: Vec<BacktestWindow> = (1..=last_cutoff)
            .filter_map(|cutoff| self.evaluate_cutoff(&sorted, cutoff))
            .collect();

        let result = BacktestResult::from_windows(details);
        info!(
            "Backtest over {} months: {} windows, model MAE {:?}, baseline MAE {:?}",
            sorted.len(),
            result.n_tests,
            result.model_mae,
            result.baseline_mae
        );
        result
    }

    fn evaluate_cutoff(&self, sorted: &[MonthlyRecord], cutoff: usize) -> Option<BacktestWindow> {
        let horizon = self.config.horizon;
        let train = &sorted[..cutoff];
        let test = &sorted[cutoff..cutoff + horizon];

        if train.len() < 2 {
            return None;
        }

        let input = SeriesInput::Months(train.to_vec());
        let predictions: Vec<f64> = match predict(&input, &self.config.forecast_config()) {
            Ok(output) => output.predictions.iter().map(|&p| p as f64).collect(),
            Err(err) => {
                trace!("Skipping cutoff {}: {}", cutoff, err);
                return None;
            }
        };

        let k = self.config.baseline_window.min(train.len());
        if k == 0 {
            return None;
        }
        let baseline = train[train.len() - k..].iter().map(|r| r.objective).mean();

        let actuals: Vec<f64> = test.iter().map(|r| r.objective).collect();
        let errors = actuals
            .iter()
            .zip(&predictions)
            .map(|(a, p)| a - p)
            .collect();
        let last = train[train.len() - 1];

        Some(BacktestWindow {
            cutoff_year: last.year,
            cutoff_month: last.month,
            predictions,
            actuals,
            errors,
            baseline_predictions: vec![baseline; horizon],
        })
    }
}

/// Run a rolling-origin backtest over dated records.
///
/// Fewer than three records, or no evaluable cutoff, yields a result with
/// every metric absent and `n_tests == 0`. Only an invalid configuration is an
/// error.
pub fn backtest(records: &[MonthlyRecord], config: &BacktestConfig) -> Result<BacktestResult> {
    Ok(BacktestEvaluator::new(config.clone())?.evaluate(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn months(objectives: &[f64]) -> Vec<MonthlyRecord> {
        objectives
            .iter()
            .enumerate()
            .map(|(i, &o)| MonthlyRecord::new(2022 + (i / 12) as i32, (i % 12) as u32 + 1, o, o * 5.0))
            .collect()
    }

    #[test]
    fn test_too_few_records() {
        let result = backtest(&months(&[1.0, 2.0]), &BacktestConfig::default()).unwrap();
        assert_eq!(result, BacktestResult::empty());
    }

    #[test]
    fn test_first_cutoff_is_skipped_for_single_training_month() {
        let config = BacktestConfig::default().with_horizon(1);
        let result = backtest(&months(&[10.0, 20.0, 30.0]), &config).unwrap();
        // cutoff 1 has one training month, cutoff 2 is evaluated
        assert_eq!(result.n_tests, 1);
        assert_eq!(result.details[0].cutoff_month, 2);
        assert_eq!(result.details[0].actuals, vec![30.0]);
        assert_relative_eq!(result.details[0].baseline_predictions[0], 15.0);
    }

    #[test]
    fn test_baseline_window_zero_emits_nothing() {
        let config = BacktestConfig::default().with_baseline_window(0);
        let result = backtest(&months(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), &config).unwrap();
        assert_eq!(result.n_tests, 0);
        assert!(result.model_mae.is_none());
    }

    #[test]
    fn test_windows_are_chronological() {
        let mut records = months(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0]);
        records.reverse();
        let result = backtest(&records, &BacktestConfig::default()).unwrap();
        assert_eq!(result.n_tests, 4);
        let cutoffs: Vec<u32> = result.details.iter().map(|w| w.cutoff_month).collect();
        assert_eq!(cutoffs, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_invalid_config() {
        let config = BacktestConfig::default().with_horizon(0);
        assert!(backtest(&months(&[1.0, 2.0, 3.0]), &config).is_err());
    }
}
