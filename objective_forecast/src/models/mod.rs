//! Forecasting models for the objective series

use std::fmt::Debug;
use thiserror::Error;

pub mod arimax;
pub mod objective;
pub mod regression;
pub mod sales_trend;

pub use arimax::{ArimaxFit, ArimaxModel};
pub use objective::ObjectiveForecastModel;
pub use regression::SalesRegression;
pub use sales_trend::SalesForecaster;

/// A model could not be estimated or could not produce a finite forecast.
///
/// Recovered inside [`ObjectiveForecastModel`]; it never reaches callers of
/// the public entry points.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Model fit failed: {0}")]
pub struct ModelFitFailure(pub String);

/// Which estimator produced a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastPath {
    /// The regression-with-memory model
    Primary,
    /// Least squares of objectives on sales
    Fallback,
}

/// Raw objective forecast together with the path that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveForecast {
    pub values: Vec<f64>,
    pub path: ForecastPath,
}

impl ObjectiveForecast {
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// A model of the objective series driven by one exogenous series
pub trait ExogenousModel: Debug {
    /// The fitted model produced
    type Fitted: FittedExogenousModel;

    /// Estimate the model on aligned history
    fn fit(&self, endog: &[f64], exog: &[f64]) -> Result<Self::Fitted, ModelFitFailure>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// An estimated model able to forecast given future exogenous values
pub trait FittedExogenousModel: Debug {
    /// One forecast per element of `future_exog`
    fn forecast(&self, future_exog: &[f64]) -> Result<Vec<f64>, ModelFitFailure>;
}
