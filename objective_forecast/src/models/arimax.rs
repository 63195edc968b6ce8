//! ARIMAX(1,1,1): regression on sales with ARIMA(1,1,1) errors
//!
//! The objective is modelled as
//!
//! ```text
//! y[t] = beta * x[t] + u[t]
//! (1 - phi B)(1 - B) u[t] = (1 + theta B) e[t],   e[t] ~ N(0, sigma^2)
//! ```
//!
//! Differencing once turns the error into an ARMA(1,1) process
//! `w[t] = dy[t] - beta * dx[t]`, whose exact Gaussian likelihood is evaluated
//! with a Kalman filter. `sigma^2` is concentrated out and `(beta, phi, theta)`
//! are estimated by minimising the negative log-likelihood with Nelder-Mead.
//!
//! Stationarity and invertibility are not enforced: `phi` and `theta` are only
//! kept inside a wide box. When `|phi| >= 1` the filter starts from an
//! approximately diffuse state and the first observation is used as burn-in.

use crate::models::{ExogenousModel, FittedExogenousModel, ModelFitFailure};
use forecast_math::{difference, nelder_mead, NelderMeadConfig};
use log::debug;

/// Autoregressive, differencing and moving-average orders of the model
pub const ARIMAX_ORDER: (usize, usize, usize) = (1, 1, 1);

/// Fewest observations accepted: four differences for three coefficients
const MIN_OBSERVATIONS: usize = 5;
/// `beta`, `phi`, `theta` and `sigma^2`
const ESTIMATED_PARAMETERS: usize = 4;
/// Search box for the AR and MA coefficients
const COEFFICIENT_BOUND: f64 = 2.0;
/// Initial state variance when the AR part is non-stationary
const DIFFUSE_VARIANCE: f64 = 1e6;
/// Floor on the innovation variance so exact fits keep a finite likelihood
const MIN_VARIANCE: f64 = 1e-300;

/// Regression-with-memory model of the objective on one exogenous driver
#[derive(Debug, Clone)]
pub struct ArimaxModel {
    name: String,
    optimizer: NelderMeadConfig,
}

/// Estimated ARIMAX(1,1,1) model
#[derive(Debug, Clone)]
pub struct ArimaxFit {
    /// Coefficient on the exogenous series
    pub beta: f64,
    /// AR(1) coefficient of the differenced error
    pub phi: f64,
    /// MA(1) coefficient of the differenced error
    pub theta: f64,
    /// Innovation variance (maximum-likelihood estimate)
    pub sigma2: f64,
    /// Maximised log-likelihood
    pub log_likelihood: f64,
    /// Akaike information criterion
    pub aic: f64,
    /// Optimiser iterations used
    pub iterations: usize,
    /// Whether the optimiser met its tolerance
    pub converged: bool,
    /// `y - beta * x` at the last observation
    last_error_level: f64,
    /// One-step prediction of the differenced error after the last observation
    next_error_step: f64,
}

impl Default for ArimaxModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ArimaxModel {
    pub fn new() -> Self {
        let (p, d, q) = ARIMAX_ORDER;
        Self {
            name: format!("ARIMAX({},{},{})", p, d, q),
            optimizer: NelderMeadConfig {
                max_iter: 2000,
                tolerance: 1e-10,
                ..NelderMeadConfig::default()
            },
        }
    }
}

impl ExogenousModel for ArimaxModel {
    type Fitted = ArimaxFit;

    fn fit(&self, endog: &[f64], exog: &[f64]) -> Result<ArimaxFit, ModelFitFailure> {
        if endog.len() != exog.len() {
            return Err(ModelFitFailure(format!(
                "endogenous length ({}) doesn't match exogenous length ({})",
                endog.len(),
                exog.len()
            )));
        }
        if endog.len() < MIN_OBSERVATIONS {
            return Err(ModelFitFailure(format!(
                "{} needs at least {} observations, got {}",
                self.name,
                MIN_OBSERVATIONS,
                endog.len()
            )));
        }
        if endog.iter().chain(exog).any(|v| !v.is_finite()) {
            return Err(ModelFitFailure("non-finite observation".to_string()));
        }

        let dy = difference(endog);
        let dx = difference(exog);

        let dx_energy: f64 = dx.iter().map(|v| v * v).sum();
        let beta0 = if dx_energy > 0.0 {
            dx.iter().zip(&dy).map(|(x, y)| x * y).sum::<f64>() / dx_energy
        } else {
            0.0
        };

        let bounds = [
            (f64::NEG_INFINITY, f64::INFINITY),
            (-COEFFICIENT_BOUND, COEFFICIENT_BOUND),
            (-COEFFICIENT_BOUND, COEFFICIENT_BOUND),
        ];
        let objective = |params: &[f64]| {
            let w = regression_errors(&dy, &dx, params[0]);
            match kalman_filter(&w, params[1], params[2]) {
                Some(run) => run.concentrated_objective(),
                None => f64::INFINITY,
            }
        };

        let first = nelder_mead(&objective, &[beta0, 0.0, 0.0], Some(&bounds), &self.optimizer);
        // A restart from the first optimum recovers from early simplex collapse
        let result = nelder_mead(
            &objective,
            &first.optimal_point,
            Some(&bounds),
            &self.optimizer,
        );
        let iterations = first.iterations + result.iterations;

        if !result.optimal_value.is_finite() {
            return Err(ModelFitFailure(
                "likelihood is not finite anywhere on the search path".to_string(),
            ));
        }
        if !result.converged {
            debug!(
                "{} optimiser stopped after {} iterations without converging",
                self.name, iterations
            );
        }

        let (beta, phi, theta) = (
            result.optimal_point[0],
            result.optimal_point[1],
            result.optimal_point[2],
        );
        let w = regression_errors(&dy, &dx, beta);
        let run = kalman_filter(&w, phi, theta)
            .ok_or_else(|| ModelFitFailure("filter breakdown at the optimum".to_string()))?;

        let sigma2 = run.sigma2();
        let log_likelihood = run.log_likelihood();
        let n = endog.len() - 1;
        let fit = ArimaxFit {
            beta,
            phi,
            theta,
            sigma2,
            log_likelihood,
            aic: -2.0 * log_likelihood + 2.0 * ESTIMATED_PARAMETERS as f64,
            iterations,
            converged: result.converged,
            last_error_level: endog[n] - beta * exog[n],
            next_error_step: run.next_prediction,
        };

        if [fit.beta, fit.phi, fit.theta, fit.last_error_level, fit.next_error_step]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(ModelFitFailure("non-finite parameter estimate".to_string()));
        }

        Ok(fit)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl FittedExogenousModel for ArimaxFit {
    fn forecast(&self, future_exog: &[f64]) -> Result<Vec<f64>, ModelFitFailure> {
        let mut level = self.last_error_level;
        let mut step = self.next_error_step;
        let mut forecasts = Vec::with_capacity(future_exog.len());

        for &x in future_exog {
            level += step;
            forecasts.push(self.beta * x + level);
            step *= self.phi;
        }

        if forecasts.iter().any(|v| !v.is_finite()) {
            return Err(ModelFitFailure("forecast diverged".to_string()));
        }
        Ok(forecasts)
    }
}

fn regression_errors(dy: &[f64], dx: &[f64], beta: f64) -> Vec<f64> {
    dy.iter().zip(dx).map(|(y, x)| y - beta * x).collect()
}

/// Accumulated output of one pass of the filter with unit innovation variance
#[derive(Debug, Clone, Copy)]
struct FilterRun {
    /// Sum of squared standardised prediction errors
    weighted_ssq: f64,
    /// Sum of log prediction-error variances
    log_det: f64,
    /// Observations contributing to the likelihood
    count: usize,
    /// Prediction of the next differenced error
    next_prediction: f64,
}

impl FilterRun {
    fn sigma2(&self) -> f64 {
        (self.weighted_ssq / self.count as f64).max(MIN_VARIANCE)
    }

    /// `-2 log L` up to constants, with `sigma^2` concentrated out
    fn concentrated_objective(&self) -> f64 {
        self.count as f64 * self.sigma2().ln() + self.log_det
    }

    fn log_likelihood(&self) -> f64 {
        let n = self.count as f64;
        -0.5 * (n * ((2.0 * std::f64::consts::PI).ln() + self.sigma2().ln() + 1.0) + self.log_det)
    }
}

/// Kalman filter for ARMA(1,1) in the state-space form
///
/// ```text
/// state  a[t] = (w[t], theta * e[t])
/// T = [[phi, 1], [0, 0]],  R = (1, theta),  Z = (1, 0)
/// ```
///
/// Returns `None` when a prediction-error variance is not positive.
fn kalman_filter(w: &[f64], phi: f64, theta: f64) -> Option<FilterRun> {
    let stationary = phi.abs() < 1.0;
    let mut p = if stationary {
        let gamma0 = (1.0 + 2.0 * phi * theta + theta * theta) / (1.0 - phi * phi);
        [[gamma0, theta], [theta, theta * theta]]
    } else {
        [[DIFFUSE_VARIANCE, theta], [theta, theta * theta]]
    };
    let burn_in = usize::from(!stationary);
    let mut a = [0.0, 0.0];

    let mut run = FilterRun {
        weighted_ssq: 0.0,
        log_det: 0.0,
        count: 0,
        next_prediction: 0.0,
    };

    for (t, &obs) in w.iter().enumerate() {
        let f = p[0][0];
        if !(f > 0.0 && f.is_finite()) {
            return None;
        }
        let v = obs - a[0];
        if t >= burn_in {
            run.weighted_ssq += v * v / f;
            run.log_det += f.ln();
            run.count += 1;
        }

        // Update
        let k = [p[0][0] / f, p[1][0] / f];
        let filtered = [a[0] + k[0] * v, a[1] + k[1] * v];
        let pf = [
            [p[0][0] - k[0] * p[0][0], p[0][1] - k[0] * p[0][1]],
            [p[1][0] - k[1] * p[0][0], p[1][1] - k[1] * p[0][1]],
        ];

        // Predict: T P T' + R R'
        a = [phi * filtered[0] + filtered[1], 0.0];
        let p00 = phi * phi * pf[0][0] + phi * (pf[0][1] + pf[1][0]) + pf[1][1];
        p = [[p00 + 1.0, theta], [theta, theta * theta]];
    }

    if run.count == 0 {
        return None;
    }
    run.next_prediction = a[0];
    Some(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_filter_white_noise() {
        // phi = theta = 0: prediction errors are the observations themselves
        let w = [1.0, -2.0, 3.0];
        let run = kalman_filter(&w, 0.0, 0.0).unwrap();
        assert_eq!(run.count, 3);
        assert_relative_eq!(run.weighted_ssq, 14.0, epsilon = 1e-12);
        assert_relative_eq!(run.log_det, 0.0, epsilon = 1e-12);
        assert_relative_eq!(run.next_prediction, 0.0);
    }

    #[test]
    fn test_white_noise_likelihood() {
        let run = kalman_filter(&[1.0, -2.0, 3.0], 0.0, 0.0).unwrap();
        assert_relative_eq!(run.sigma2(), 14.0 / 3.0, epsilon = 1e-12);
        let expected =
            -1.5 * ((2.0 * std::f64::consts::PI).ln() + (14.0_f64 / 3.0).ln() + 1.0);
        assert_relative_eq!(run.log_likelihood(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_fit_diagnostics_match_filter_at_estimate() {
        let sales: Vec<f64> = (0..24)
            .map(|i| 100.0 + 7.0 * i as f64 + 15.0 * (i as f64).sin())
            .collect();
        let objectives: Vec<f64> = sales
            .iter()
            .enumerate()
            .map(|(i, s)| 50.0 + 0.3 * s + 3.0 * (1.7 * i as f64).cos())
            .collect();

        let fit = ArimaxModel::new().fit(&objectives, &sales).unwrap();

        let w = regression_errors(&difference(&objectives), &difference(&sales), fit.beta);
        let run = kalman_filter(&w, fit.phi, fit.theta).unwrap();
        assert_relative_eq!(fit.sigma2, run.sigma2(), max_relative = 1e-12);
        assert_relative_eq!(fit.log_likelihood, run.log_likelihood(), max_relative = 1e-12);
        assert_relative_eq!(fit.aic, -2.0 * fit.log_likelihood + 8.0, epsilon = 1e-9);
        assert!(fit.sigma2 > 0.0);
        assert!(fit.iterations > 0);
        assert!(fit.converged || fit.iterations >= 2000);
        assert!(fit.phi.abs() <= COEFFICIENT_BOUND && fit.theta.abs() <= COEFFICIENT_BOUND);
    }

    #[test]
    fn test_filter_ar1_prediction() {
        let w = [1.0, 2.0];
        let run = kalman_filter(&w, 0.5, 0.0).unwrap();
        assert_relative_eq!(run.next_prediction, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_filter_nonstationary_burn_in() {
        let run = kalman_filter(&[5.0, 6.0, 7.0], 1.2, 0.3).unwrap();
        assert_eq!(run.count, 2);
        assert!(run.concentrated_objective().is_finite());
    }

    #[test]
    fn test_exact_linear_relationship() {
        let objectives = [10.0, 12.0, 14.0, 16.0, 18.0, 20.0];
        let sales = [100.0, 110.0, 120.0, 130.0, 140.0, 150.0];
        let fit = ArimaxModel::new().fit(&objectives, &sales).unwrap();
        assert_relative_eq!(fit.beta, 0.2, epsilon = 1e-6);

        let forecast = fit.forecast(&[160.0, 170.0, 180.0]).unwrap();
        assert_relative_eq!(forecast[0], 22.0, epsilon = 1e-3);
        assert_relative_eq!(forecast[2], 26.0, epsilon = 1e-3);
    }

    #[test]
    fn test_too_few_observations() {
        let err = ArimaxModel::new()
            .fit(&[1.0, 2.0, 3.0, 4.0], &[4.0, 5.0, 6.0, 8.0])
            .unwrap_err();
        assert!(err.0.contains("at least 5"));
    }

    #[test]
    fn test_non_finite_input_fails() {
        assert!(ArimaxModel::new()
            .fit(&[1.0, f64::NAN, 3.0, 4.0, 5.0], &[1.0, 2.0, 3.0, 4.0, 5.0])
            .is_err());
    }

    #[test]
    fn test_name() {
        assert_eq!(ArimaxModel::new().name(), "ARIMAX(1,1,1)");
    }
}
