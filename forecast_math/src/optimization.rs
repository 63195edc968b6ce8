//! Derivative-free minimisation for likelihood estimation

/// Configuration for Nelder-Mead minimisation
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations
    pub max_iter: usize,
    /// Convergence tolerance on both the spread of simplex values and the
    /// distance of every vertex from the best one
    pub tolerance: f64,
    /// Reflection coefficient
    pub alpha: f64,
    /// Expansion coefficient
    pub gamma: f64,
    /// Contraction coefficient
    pub rho: f64,
    /// Shrink coefficient
    pub sigma: f64,
    /// Step used to build the initial simplex around a zero coordinate
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.1,
        }
    }
}

/// Outcome of a Nelder-Mead run
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found
    pub optimal_point: Vec<f64>,
    /// Objective value at `optimal_point`
    pub optimal_value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the tolerance was met before `max_iter`
    pub converged: bool,
}

/// Minimise `objective` starting from `initial`.
///
/// `bounds`, when given, holds one `(min, max)` pair per coordinate and every
/// trial point is clamped into that box. Non-finite objective values are
/// treated as `+inf`, so a region where the objective breaks down is simply
/// avoided rather than aborting the search.
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    let eval = |point: &[f64]| {
        let value = objective(point);
        if value.is_finite() {
            value
        } else {
            f64::INFINITY
        }
    };

    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: eval(&[]),
            iterations: 0,
            converged: true,
        };
    }

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(clamp(initial.to_vec(), bounds));
    for i in 0..n {
        let mut vertex = simplex[0].clone();
        let step = if vertex[i].abs() > 1e-10 {
            config.initial_step * vertex[i].abs()
        } else {
            config.initial_step
        };
        vertex[i] += step;
        simplex.push(clamp(vertex, bounds));
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        if values[best].is_finite()
            && values[worst] - values[best] < config.tolerance
            && max_distance_from(&simplex, best) < config.tolerance
        {
            converged = true;
            break;
        }

        let centroid = centroid_without(&simplex, worst);

        let reflected = clamp(
            combine(&centroid, &simplex[worst], config.alpha),
            bounds,
        );
        let reflected_value = eval(&reflected);

        if reflected_value < values[best] {
            let expanded = clamp(combine(&centroid, &reflected, -config.gamma), bounds);
            let expanded_value = eval(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        let (contracted, target) = if reflected_value < values[worst] {
            (
                clamp(combine(&centroid, &reflected, -config.rho), bounds),
                reflected_value,
            )
        } else {
            (
                clamp(combine(&centroid, &simplex[worst], -config.rho), bounds),
                values[worst],
            )
        };
        let contracted_value = eval(&contracted);
        if contracted_value < target {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        let anchor = simplex[best].clone();
        for i in 0..=n {
            if i == best {
                continue;
            }
            let shrunk: Vec<f64> = anchor
                .iter()
                .zip(&simplex[i])
                .map(|(a, v)| a + config.sigma * (v - a))
                .collect();
            simplex[i] = clamp(shrunk, bounds);
            values[i] = eval(&simplex[i]);
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .unwrap_or(0);

    NelderMeadResult {
        optimal_point: simplex[best].clone(),
        optimal_value: values[best],
        iterations,
        converged,
    }
}

/// `centroid + coef * (centroid - point)`: reflection for positive `coef`,
/// expansion or contraction towards `point` for negative `coef`.
fn combine(centroid: &[f64], point: &[f64], coef: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(point)
        .map(|(c, p)| c + coef * (c - p))
        .collect()
}

/// Largest Euclidean distance between `simplex[from]` and any other vertex
fn max_distance_from(simplex: &[Vec<f64>], from: usize) -> f64 {
    simplex
        .iter()
        .map(|vertex| {
            vertex
                .iter()
                .zip(&simplex[from])
                .map(|(v, b)| (v - b).powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .fold(0.0, f64::max)
}

fn centroid_without(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let dim = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; dim];
    for (i, vertex) in simplex.iter().enumerate() {
        if i == exclude {
            continue;
        }
        for (c, v) in centroid.iter_mut().zip(vertex) {
            *c += v;
        }
    }
    centroid.iter_mut().for_each(|c| *c /= count);
    centroid
}

fn clamp(mut point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    if let Some(bounds) = bounds {
        for (x, &(lo, hi)) in point.iter_mut().zip(bounds) {
            *x = x.clamp(lo, hi);
        }
    }
    point
}
