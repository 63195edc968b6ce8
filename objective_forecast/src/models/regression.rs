//! Least-squares regression of objectives on sales

use crate::models::{ExogenousModel, FittedExogenousModel, ModelFitFailure};
use forecast_math::{mean, LinearFit, MathError};

/// `objective = intercept + slope * sales`, fitted by ordinary least squares.
///
/// This is the deterministic fallback behind the primary model. When sales
/// never vary the slope is unidentified and the line degenerates to the mean
/// objective.
#[derive(Debug, Clone, Default)]
pub struct SalesRegression;

impl SalesRegression {
    pub fn new() -> Self {
        Self
    }
}

impl ExogenousModel for SalesRegression {
    type Fitted = LinearFit;

    fn fit(&self, endog: &[f64], exog: &[f64]) -> Result<LinearFit, ModelFitFailure> {
        match LinearFit::fit(exog, endog) {
            Ok(fit) => Ok(fit),
            Err(MathError::CalculationError(_)) => Ok(LinearFit {
                slope: 0.0,
                intercept: mean(endog),
            }),
            Err(err) => Err(ModelFitFailure(err.to_string())),
        }
    }

    fn name(&self) -> &str {
        "OLS(objective ~ sales)"
    }
}

impl FittedExogenousModel for LinearFit {
    fn forecast(&self, future_exog: &[f64]) -> Result<Vec<f64>, ModelFitFailure> {
        Ok(future_exog.iter().map(|&x| self.predict(x)).collect())
    }
}
