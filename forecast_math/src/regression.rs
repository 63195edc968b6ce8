//! Closed-form ordinary least squares for a single predictor

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Smallest predictor spread treated as non-degenerate
const MIN_SPREAD: f64 = 1e-10;

/// A fitted straight line `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Change in `y` per unit of `x`
    pub slope: f64,
    /// Value of `y` at `x = 0`
    pub intercept: f64,
}

impl LinearFit {
    /// Fit `y` against `x` by least squares, intercept included.
    ///
    /// Fails when fewer than two points are given, when the slices differ in
    /// length, or when every `x` is (numerically) the same value.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(MathError::InvalidInput(format!(
                "Predictor length ({}) doesn't match response length ({})",
                x.len(),
                y.len()
            )));
        }
        if x.len() < 2 {
            return Err(MathError::InsufficientData(
                "Need at least 2 points for linear regression".to_string(),
            ));
        }

        let n = x.len() as f64;
        let x_mean = x.iter().sum::<f64>() / n;
        let y_mean = y.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (&xi, &yi) in x.iter().zip(y) {
            numerator += (xi - x_mean) * (yi - y_mean);
            denominator += (xi - x_mean) * (xi - x_mean);
        }

        if denominator.abs() < MIN_SPREAD {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: x values are too similar".to_string(),
            ));
        }

        let slope = numerator / denominator;
        Ok(Self {
            slope,
            intercept: y_mean - slope * x_mean,
        })
    }

    /// Fit `y` against its own 0-based index.
    pub fn fit_trend(y: &[f64]) -> Result<Self> {
        let x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
        Self::fit(&x, y)
    }

    /// Evaluate the line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_line() {
        let fit = LinearFit::fit(&[1.0, 2.0, 3.0], &[5.0, 7.0, 9.0]).unwrap();
        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 3.0, epsilon = 1e-12);
        assert_relative_eq!(fit.predict(10.0), 23.0, epsilon = 1e-12);
    }

    #[test]
    fn test_trend_two_points() {
        let fit = LinearFit::fit_trend(&[10.0, 4.0]).unwrap();
        assert_relative_eq!(fit.slope, -6.0);
        assert_relative_eq!(fit.intercept, 10.0);
    }

    #[test]
    fn test_noisy_line_least_squares() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.5, 1.5, 3.5, 3.5];
        let fit = LinearFit::fit(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 0.8, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 1.3, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(
            LinearFit::fit(&[1.0], &[1.0]),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            LinearFit::fit(&[1.0, 2.0], &[1.0]),
            Err(MathError::InvalidInput(_))
        ));
        assert!(matches!(
            LinearFit::fit(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]),
            Err(MathError::CalculationError(_))
        ));
    }
}
