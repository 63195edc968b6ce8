//! Linear trend projection of the sales driver

use crate::error::{ForecastError, Result};
use forecast_math::LinearFit;

/// Projects sales forward by extrapolating a straight line fitted to the
/// most recent observations.
#[derive(Debug, Clone)]
pub struct SalesForecaster {
    recent_window: usize,
}

impl SalesForecaster {
    pub fn new(recent_window: usize) -> Result<Self> {
        if recent_window < 2 {
            return Err(ForecastError::InvalidParameter(
                "Recent window must be at least 2".to_string(),
            ));
        }
        Ok(Self { recent_window })
    }

    pub fn recent_window(&self) -> usize {
        self.recent_window
    }

    /// Trend line over the last `recent_window` points, indexed from 0
    pub fn trend(&self, sales: &[f64]) -> Result<LinearFit> {
        if sales.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: sales.len(),
            });
        }
        let window = &sales[sales.len().saturating_sub(self.recent_window)..];
        Ok(LinearFit::fit_trend(window)?)
    }

    /// `horizon` projected sales values, never negative
    pub fn forecast(&self, sales: &[f64], horizon: usize) -> Result<Vec<f64>> {
        let trend = self.trend(sales)?;
        let start = sales.len().min(self.recent_window);
        Ok((start..start + horizon)
            .map(|x| trend.predict(x as f64).max(0.0))
            .collect())
    }
}
