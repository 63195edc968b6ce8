//! Bounded multiplicative calibration of raw forecasts

use crate::config::ScalingConfig;
use forecast_math::mean;

/// Nudges forecasts by the historical sales-to-objective ratio, within a
/// narrow clamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalingAdjuster {
    config: ScalingConfig,
}

impl ScalingAdjuster {
    pub fn new(config: ScalingConfig) -> Self {
        Self { config }
    }

    /// Multiplier implied by the history, or `None` when the mean objective
    /// is not positive
    pub fn multiplier(&self, objectives: &[f64], sales: &[f64]) -> Option<f64> {
        let avg_obj = mean(objectives);
        if avg_obj <= 0.0 {
            return None;
        }
        let ratio = mean(sales) / avg_obj;
        Some(
            (1.0 + self.config.coefficient * (ratio - 1.0))
                .clamp(self.config.min_multiplier, self.config.max_multiplier),
        )
    }

    pub fn apply(&self, forecasts: &[f64], objectives: &[f64], sales: &[f64]) -> Vec<f64> {
        match self.multiplier(objectives, sales) {
            Some(multiplier) => forecasts.iter().map(|f| f * multiplier).collect(),
            None => forecasts.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(&[10.0, 10.0], &[10.0, 10.0], 1.0)]
    #[case(&[10.0, 10.0], &[11.0, 11.0], 1.02)]
    #[case(&[10.0, 10.0], &[100.0, 100.0], 1.15)]
    #[case(&[10.0, 10.0], &[0.0, 0.0], 0.9)]
    fn test_multiplier(#[case] objectives: &[f64], #[case] sales: &[f64], #[case] expected: f64) {
        let m = ScalingAdjuster::default()
            .multiplier(objectives, sales)
            .unwrap();
        assert_relative_eq!(m, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_non_positive_history_is_a_no_op() {
        let adjuster = ScalingAdjuster::default();
        let raw = [5.0, 6.0, 7.0];
        assert_eq!(adjuster.apply(&raw, &[0.0, 0.0], &[10.0, 10.0]), raw.to_vec());
        assert_eq!(adjuster.apply(&raw, &[-5.0, 1.0], &[10.0, 10.0]), raw.to_vec());
        assert_eq!(adjuster.apply(&raw, &[], &[]), raw.to_vec());
    }

    #[test]
    fn test_apply_scales_every_value() {
        let adjuster = ScalingAdjuster::default();
        let scaled = adjuster.apply(&[100.0, 200.0], &[10.0], &[100.0]);
        assert_relative_eq!(scaled[0], 115.0, epsilon = 1e-9);
        assert_relative_eq!(scaled[1], 230.0, epsilon = 1e-9);
    }
}
