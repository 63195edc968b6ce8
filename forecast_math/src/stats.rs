//! Descriptive helpers over plain slices

/// Arithmetic mean; an empty slice has mean 0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// First differences `x[t] - x[t-1]`, one element shorter than the input.
pub fn difference(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] - w[0]).collect()
}
