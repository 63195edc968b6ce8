//! Accuracy metrics for evaluating forecasts

use statrs::statistics::Statistics;

/// Mean absolute error over paired values; `None` when there are no pairs.
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .collect();
    if errors.is_empty() {
        return None;
    }
    Some(errors.mean())
}

/// Mean absolute percentage error, in percent.
///
/// Pairs whose actual value is exactly zero are left out of the average.
/// `None` when no pair remains.
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    let ratios: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, p)| (a - p).abs() / a.abs())
        .collect();
    if ratios.is_empty() {
        return None;
    }
    Some(ratios.mean() * 100.0)
}
