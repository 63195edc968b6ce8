//! The objective forecaster: ARIMAX on projected sales, with an OLS fallback

use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::models::{
    ArimaxModel, ExogenousModel, FittedExogenousModel, ForecastPath, ModelFitFailure,
    ObjectiveForecast, SalesForecaster, SalesRegression,
};
use log::debug;

/// Forecasts objectives from their own history and the sales driver.
///
/// Sales are projected with [`SalesForecaster`]; the primary [`ArimaxModel`]
/// is conditioned on that projection. Any fitting failure of the primary model
/// switches to [`SalesRegression`], so a forecast is returned whenever the
/// input holds at least two points.
#[derive(Debug, Clone)]
pub struct ObjectiveForecastModel {
    horizon: usize,
    sales_forecaster: SalesForecaster,
    primary: Option<ArimaxModel>,
    fallback: SalesRegression,
}

impl ObjectiveForecastModel {
    pub fn new(horizon: usize, recent_window: usize) -> Result<Self> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Horizon must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            horizon,
            sales_forecaster: SalesForecaster::new(recent_window)?,
            primary: Some(ArimaxModel::new()),
            fallback: SalesRegression::new(),
        })
    }

    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.horizon, config.recent_window)?.with_primary_model(config.use_primary_model))
    }

    /// Enable or disable the primary model
    pub fn with_primary_model(mut self, enabled: bool) -> Self {
        self.primary = enabled.then(ArimaxModel::new);
        self
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Forecast `horizon` non-negative objective values.
    ///
    /// Only fails for inputs shorter than two points or of unequal length.
    pub fn forecast(&self, objectives: &[f64], sales: &[f64]) -> Result<ObjectiveForecast> {
        let shortest = objectives.len().min(sales.len());
        if shortest < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: shortest,
            });
        }
        if objectives.len() != sales.len() {
            return Err(ForecastError::ValidationError(format!(
                "objectives and sales must have the same length ({} vs {})",
                objectives.len(),
                sales.len()
            )));
        }

        let future_sales = self.sales_forecaster.forecast(sales, self.horizon)?;

        let primary = match &self.primary {
            Some(model) => fit_and_forecast(model, objectives, sales, &future_sales),
            None => Err(ModelFitFailure("primary model disabled".to_string())),
        };

        let (values, path) = match primary {
            Ok(values) => (values, ForecastPath::Primary),
            Err(failure) => {
                debug!("Falling back to {}: {}", self.fallback.name(), failure);
                let values = fit_and_forecast(&self.fallback, objectives, sales, &future_sales)
                    .map_err(|err| ForecastError::ValidationError(err.0))?;
                (values, ForecastPath::Fallback)
            }
        };

        Ok(ObjectiveForecast {
            values: values.into_iter().map(|v| v.max(0.0)).collect(),
            path,
        })
    }
}

fn fit_and_forecast<M: ExogenousModel>(
    model: &M,
    endog: &[f64],
    exog: &[f64],
    future_exog: &[f64],
) -> std::result::Result<Vec<f64>, ModelFitFailure> {
    model.fit(endog, exog)?.forecast(future_exog)
}
